//! Uniform JSON response envelope
//!
//! Success: `{success: true, message, data?, timestamp}`.
//! Failure: `{success: false, message: <reason phrase>, error, timestamp}`.
//! Absent fields are omitted rather than sent as `null`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Epoch milliseconds at construction
    pub timestamp: i64,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

impl Envelope<()> {
    pub fn failure(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: status.canonical_reason().unwrap_or("Error").to_string(),
            data: None,
            error: Some(error.into()),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Render a failure envelope with `status`.
pub fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(Envelope::failure(status, error))).into_response()
}

/// Successful handler result: a status code plus an envelope.
#[derive(Debug)]
pub struct Reply<T> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T: Serialize> Reply<T> {
    /// 200 with `data`
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::success(message, Some(data)),
        }
    }

    /// 201 with the created resource
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            envelope: Envelope::success(message, Some(data)),
        }
    }
}

impl Reply<()> {
    /// 200 without a payload
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::success(message, None),
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
