//! Subject endpoints (read-only)

use axum::{
    extract::State,
    routing::get,
    Router,
};

use crate::db::repos::{Subject, SubjectRepo};
use crate::http::envelope::Reply;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiPath, ValidId};
use crate::http::state::AppState;

/// GET /subjects
async fn list_subjects(State(state): State<AppState>) -> Result<Reply<Vec<Subject>>, ApiError> {
    let subjects = SubjectRepo::new(state.pool()).list().await?;
    Ok(Reply::ok(subjects, "Subjects retrieved successfully"))
}

/// GET /subjects/{id}
async fn get_subject(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Reply<Subject>, ApiError> {
    let subject = SubjectRepo::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subject", id))?;
    Ok(Reply::ok(subject, "Subject retrieved successfully"))
}

/// GET /subjects/course/{course}
async fn list_by_course(
    State(state): State<AppState>,
    ApiPath(course): ApiPath<String>,
) -> Result<Reply<Vec<Subject>>, ApiError> {
    let subjects = SubjectRepo::new(state.pool())
        .list_by_course(course.trim())
        .await?;
    Ok(Reply::ok(subjects, "Subjects retrieved successfully"))
}

/// Subject routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(list_subjects))
        .route("/subjects/{id}", get(get_subject))
        .route("/subjects/course/{course}", get(list_by_course))
}
