//! Dashboard statistics

use axum::{extract::State, routing::get, Router};
use serde::Serialize;

use crate::db::repos::{DashboardRepo, StudentRepo, StudentSummary};
use crate::http::envelope::Reply;
use crate::http::error::ApiError;
use crate::http::state::AppState;

/// Students listed under "recent" on the dashboard.
const RECENT_STUDENTS: i64 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_subjects: i64,
    pub total_courses: i64,
    pub total_marks: i64,
    pub total_attendance: i64,
    pub recent_students: Vec<StudentSummary>,
}

/// GET /dashboard/stats
async fn stats(State(state): State<AppState>) -> Result<Reply<DashboardStats>, ApiError> {
    let counts = DashboardRepo::new(state.pool()).counts().await?;
    let recent_students = StudentRepo::new(state.pool())
        .recent(RECENT_STUDENTS)
        .await?;

    tracing::debug!(
        total_students = counts.total_students,
        total_courses = counts.total_courses,
        "Dashboard statistics computed"
    );

    Ok(Reply::ok(
        DashboardStats {
            total_students: counts.total_students,
            total_subjects: counts.total_subjects,
            total_courses: counts.total_courses,
            total_marks: counts.total_marks,
            total_attendance: counts.total_attendance,
            recent_students,
        },
        "Dashboard statistics retrieved successfully",
    ))
}

/// Dashboard routes
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(stats))
}
