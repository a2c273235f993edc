//! Attendance endpoints

use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::marks::SubjectFilter;
use crate::db::repos::{AttendanceRepo, AttendanceWithNames, AttendanceWithSubject};
use crate::http::envelope::Reply;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ValidId};
use crate::http::state::AppState;
use crate::models::dates::optional_date;
use crate::models::{lenient, AttendanceInput, ValidationError};

/// Optional `?date=&subjectId=` roll-call filter; both or neither.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollCallFilter {
    #[serde(default, deserialize_with = "optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub subject_id: Option<i32>,
}

/// GET /attendance
async fn list_attendance(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<RollCallFilter>,
) -> Result<Reply<Vec<AttendanceWithNames>>, ApiError> {
    let repo = AttendanceRepo::new(state.pool());
    let rows = match (filter.date, filter.subject_id) {
        (Some(date), Some(subject_id)) => repo.list_for_date_and_subject(date, subject_id).await?,
        (None, None) => repo.list().await?,
        _ => {
            return Err(ValidationError::Incomplete {
                fields: "date and subjectId",
            }
            .into())
        }
    };
    Ok(Reply::ok(rows, "Attendance retrieved successfully"))
}

/// GET /attendance/student/{id}?subjectId=
async fn list_for_student(
    State(state): State<AppState>,
    ValidId(student_id): ValidId,
    ApiQuery(filter): ApiQuery<SubjectFilter>,
) -> Result<Reply<Vec<AttendanceWithSubject>>, ApiError> {
    let repo = AttendanceRepo::new(state.pool());
    let rows = match filter.subject_id {
        Some(subject_id) => repo.list_for_student_and_subject(student_id, subject_id).await?,
        None => repo.list_for_student(student_id).await?,
    };
    Ok(Reply::ok(rows, "Attendance retrieved successfully"))
}

/// GET /attendance/student/{id}/percentage - subject name to present share
async fn percentage(
    State(state): State<AppState>,
    ValidId(student_id): ValidId,
) -> Result<Reply<BTreeMap<String, f64>>, ApiError> {
    let percentages = AttendanceRepo::new(state.pool())
        .percentage(student_id)
        .await?;
    Ok(Reply::ok(
        percentages,
        "Attendance percentage retrieved successfully",
    ))
}

/// POST /attendance - returns the student's full attendance after marking
async fn mark_attendance(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AttendanceInput>,
) -> Result<Reply<Vec<AttendanceWithSubject>>, ApiError> {
    let attendance = input.validate()?;
    let repo = AttendanceRepo::new(state.pool());

    repo.mark(&attendance, Utc::now()).await?;
    let rows = repo.list_for_student(attendance.student_id).await?;
    Ok(Reply::ok(rows, "Attendance marked successfully"))
}

/// DELETE /attendance/{id}
async fn delete_attendance(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Reply<()>, ApiError> {
    if !AttendanceRepo::new(state.pool()).delete(id).await? {
        return Err(ApiError::not_found("Attendance", id));
    }
    tracing::info!(id, "Attendance deleted");
    Ok(Reply::done("Attendance deleted successfully"))
}

/// Attendance routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(list_attendance).post(mark_attendance))
        .route("/attendance/{id}", delete(delete_attendance))
        .route("/attendance/student/{id}", get(list_for_student))
        .route("/attendance/student/{id}/percentage", get(percentage))
}
