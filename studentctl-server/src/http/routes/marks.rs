//! Marks endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::repos::{MarksRepo, MarksWithNames, MarksWithSubject};
use crate::http::envelope::Reply;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ValidId};
use crate::http::state::AppState;
use crate::models::{lenient, MarksInput};

/// Marks row plus its derived percentage
#[derive(Debug, Serialize)]
pub struct MarksView<T> {
    #[serde(flatten)]
    pub marks: T,
    pub percentage: f64,
}

impl From<MarksWithSubject> for MarksView<MarksWithSubject> {
    fn from(marks: MarksWithSubject) -> Self {
        Self {
            percentage: marks.percentage(),
            marks,
        }
    }
}

impl From<MarksWithNames> for MarksView<MarksWithNames> {
    fn from(marks: MarksWithNames) -> Self {
        Self {
            percentage: marks.marks.percentage(),
            marks,
        }
    }
}

fn views<T>(rows: Vec<T>) -> Vec<MarksView<T>>
where
    MarksView<T>: From<T>,
{
    rows.into_iter().map(MarksView::from).collect()
}

/// Optional `?subjectId=` filter
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectFilter {
    #[serde(default, deserialize_with = "lenient::number")]
    pub subject_id: Option<i32>,
}

/// GET /marks - every entry with student and subject names
async fn list_marks(
    State(state): State<AppState>,
) -> Result<Reply<Vec<MarksView<MarksWithNames>>>, ApiError> {
    let marks = MarksRepo::new(state.pool()).list().await?;
    Ok(Reply::ok(views(marks), "Marks retrieved successfully"))
}

/// GET /marks/{id}
async fn get_marks(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Reply<MarksView<MarksWithSubject>>, ApiError> {
    let marks = MarksRepo::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Marks", id))?;
    Ok(Reply::ok(marks.into(), "Marks retrieved successfully"))
}

/// GET /marks/student/{id}?subjectId=
async fn list_for_student(
    State(state): State<AppState>,
    ValidId(student_id): ValidId,
    ApiQuery(filter): ApiQuery<SubjectFilter>,
) -> Result<Reply<Vec<MarksView<MarksWithSubject>>>, ApiError> {
    let repo = MarksRepo::new(state.pool());
    let marks = match filter.subject_id {
        Some(subject_id) => repo.list_for_student_and_subject(student_id, subject_id).await?,
        None => repo.list_for_student(student_id).await?,
    };
    Ok(Reply::ok(views(marks), "Marks retrieved successfully"))
}

/// POST /marks
async fn create_marks(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MarksInput>,
) -> Result<Reply<MarksView<MarksWithSubject>>, ApiError> {
    let marks = input.validate()?;
    let repo = MarksRepo::new(state.pool());

    let id = repo.create(&marks, Utc::now()).await?;
    let created = repo.get(id).await?.ok_or_else(|| ApiError::Internal {
        message: format!("marks {} missing after insert", id),
    })?;
    Ok(Reply::created(created.into(), "Marks added successfully"))
}

/// PUT /marks/{id} - only the score fields change
async fn update_marks(
    State(state): State<AppState>,
    ValidId(id): ValidId,
    ApiJson(input): ApiJson<MarksInput>,
) -> Result<Reply<MarksView<MarksWithSubject>>, ApiError> {
    let score = input.validate_score()?;
    let repo = MarksRepo::new(state.pool());

    if !repo.update(id, &score, Utc::now()).await? {
        return Err(ApiError::not_found("Marks", id));
    }
    tracing::info!(id, "Marks updated");

    let updated = repo
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Marks", id))?;
    Ok(Reply::ok(updated.into(), "Marks updated successfully"))
}

/// DELETE /marks/{id}
async fn delete_marks(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Reply<()>, ApiError> {
    if !MarksRepo::new(state.pool()).delete(id).await? {
        return Err(ApiError::not_found("Marks", id));
    }
    tracing::info!(id, "Marks deleted");
    Ok(Reply::done("Marks deleted successfully"))
}

/// Marks routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/marks", post(create_marks).get(list_marks))
        .route(
            "/marks/{id}",
            get(get_marks).put(update_marks).delete(delete_marks),
        )
        .route("/marks/student/{id}", get(list_for_student))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::db::repos::students::test_support::unique_email;
    use crate::http::test_support::{app, body_json, get, json_request, live_app};

    #[tokio::test]
    async fn negative_marks_are_rejected() {
        let response = app()
            .oneshot(json_request(
                Method::POST,
                "/api/marks",
                r#"{"studentId":"1","subjectId":"2","marksObtained":"-5","totalMarks":"100"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Marks obtained must not be negative"
        );
    }

    #[tokio::test]
    async fn zero_total_is_rejected_on_update() {
        let response = app()
            .oneshot(json_request(
                Method::PUT,
                "/api/marks/4",
                r#"{"marksObtained":10,"totalMarks":0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_subject_filter_is_400() {
        let response = app()
            .oneshot(get("/api/marks/student/1?subjectId=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn view_adds_percentage() {
        let row = MarksWithSubject {
            id: 1,
            student_id: 1,
            subject_id: 1,
            marks_obtained: 30.0,
            total_marks: 40.0,
            exam_type: Some("Final".into()),
            exam_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            subject_name: "Calculus".into(),
            subject_code: "MA101".into(),
        };
        let json = serde_json::to_value(MarksView::from(row)).unwrap();
        assert_eq!(json["percentage"], 75.0);
        assert_eq!(json["marksObtained"], 30.0);
        assert_eq!(json["subjectName"], "Calculus");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn post_then_list_for_student() {
        let app = live_app().await;
        let student = body_json(
            app.clone()
                .oneshot(json_request(
                    Method::POST,
                    "/api/students",
                    &format!(
                        r#"{{"name":"Marks Owner","email":"{}","phone":"9876543210","course":"Physics"}}"#,
                        unique_email("marks-route")
                    ),
                ))
                .await
                .unwrap(),
        )
        .await;
        let student_id = student["data"]["id"].as_i64().unwrap();
        let subjects = body_json(app.clone().oneshot(get("/api/subjects")).await.unwrap()).await;
        let subject_id = subjects["data"][0]["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/marks",
                &format!(
                    r#"{{"studentId":{student_id},"subjectId":"{subject_id}","marksObtained":"45","totalMarks":"50","examType":"Quiz","examDate":"2024-04-01"}}"#
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["percentage"], 90.0);

        let listed = body_json(
            app.oneshot(get(&format!(
                "/api/marks/student/{student_id}?subjectId={subject_id}"
            )))
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    }
}
