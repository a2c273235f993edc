//! API error types with IntoResponse
//!
//! Errors render as failure envelopes. Persistence and internal failures are
//! logged and reported with a generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::envelope::failure;
use crate::auth::PasswordError;
use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed id, JSON body or query string (400)
    BadRequest(String),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Uniqueness conflict such as a duplicate email (409)
    Conflict(String),

    /// Login failed (401)
    Unauthorized(String),

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest(message) | Self::Conflict(message) | Self::Unauthorized(message) => {
                message
            }
            Self::NotFound { resource, id } => {
                tracing::warn!(resource, id = %id, "Not found");
                format!("{} not found", resource)
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "an internal error occurred".to_string()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                "an internal error occurred".to_string()
            }
        };

        failure(status, detail)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::UniqueViolation { constraint } => {
                let message = match constraint.as_deref() {
                    Some("students_email_key") => "Email already exists",
                    Some("students_roll_number_key") => "Roll number already exists",
                    _ => "Record already exists",
                };
                Self::Conflict(message.to_string())
            }
            DbError::ForeignKeyViolation { .. } => {
                Self::BadRequest("Referenced student or subject does not exist".to_string())
            }
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        Self::Internal {
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid JSON data: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(format!("Invalid path: {}", rejection.body_text()))
    }
}
