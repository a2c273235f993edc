//! Student endpoints

use axum::{
    extract::State,
    routing::get,
    Router,
};
use chrono::Utc;

use super::today;
use crate::db::repos::{Student, StudentRepo};
use crate::http::envelope::Reply;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::state::AppState;
use crate::models::{StudentInput, DEFAULT_PASSWORD};

fn email_taken(email: &str) -> ApiError {
    ApiError::Conflict(format!("Email already exists: {}", email))
}

/// GET /students - newest first
async fn list_students(State(state): State<AppState>) -> Result<Reply<Vec<Student>>, ApiError> {
    let students = StudentRepo::new(state.pool()).list().await?;
    Ok(Reply::ok(students, "Students retrieved successfully"))
}

/// GET /students/{id}
async fn get_student(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Reply<Student>, ApiError> {
    let student = StudentRepo::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student", id))?;
    Ok(Reply::ok(student, "Student retrieved successfully"))
}

/// POST /students - accounts created without a password get the default one
async fn create_student(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StudentInput>,
) -> Result<Reply<Student>, ApiError> {
    let student = input.validate(today())?;
    let repo = StudentRepo::new(state.pool());

    if repo.email_exists(student.email.as_str(), None).await? {
        return Err(email_taken(student.email.as_str()));
    }

    let password = student.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
    let hash = state.hash_password(password).await?;
    let created = repo.create(&student, &hash, Utc::now()).await?;

    Ok(Reply::created(created, "Student added successfully"))
}

/// PUT /students/{id} - the id comes from the path, never the body
async fn update_student(
    State(state): State<AppState>,
    ValidId(id): ValidId,
    ApiJson(input): ApiJson<StudentInput>,
) -> Result<Reply<Student>, ApiError> {
    let student = input.validate(today())?;
    let repo = StudentRepo::new(state.pool());

    if repo.email_exists(student.email.as_str(), Some(id)).await? {
        return Err(email_taken(student.email.as_str()));
    }

    let hash = match student.password.as_deref() {
        Some(password) => Some(state.hash_password(password).await?),
        None => None,
    };

    if !repo.update(id, &student, hash.as_deref(), Utc::now()).await? {
        return Err(ApiError::not_found("Student", id));
    }
    tracing::info!(id, password_changed = hash.is_some(), "Student updated");

    let updated = repo
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student", id))?;
    Ok(Reply::ok(updated, "Student updated successfully"))
}

/// DELETE /students/{id} - marks and attendance go with it
async fn delete_student(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Reply<()>, ApiError> {
    if !StudentRepo::new(state.pool()).delete(id).await? {
        return Err(ApiError::not_found("Student", id));
    }
    tracing::info!(id, "Student deleted");
    Ok(Reply::done("Student deleted successfully"))
}

/// Student routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::db::repos::students::test_support::unique_email;
    use crate::http::test_support::{app, body_json, get, json_request, live_app};

    fn payload(email: &str) -> String {
        format!(
            r#"{{"name":"Asha Verma","email":"{email}","phone":"9876543210","course":"Physics","dob":"2003-04-09","city":"Pune"}}"#
        )
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let response = app().oneshot(get("/api/students/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Bad Request");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let response = app()
            .oneshot(json_request(Method::POST, "/api/students", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON data"));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_before_storage() {
        let response = app()
            .oneshot(json_request(
                Method::POST,
                "/api/students",
                r#"{"name":"A","email":"not-an-email","phone":"9876543210","course":"CS"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid email format");
    }

    #[tokio::test]
    async fn future_birth_date_is_rejected() {
        let response = app()
            .oneshot(json_request(
                Method::PUT,
                "/api/students/3",
                r#"{"name":"A","email":"a@x.com","phone":"9876543210","course":"CS","dob":"2999-01-01"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Date of birth cannot be in the future"
        );
    }

    #[tokio::test]
    async fn unreachable_database_is_generic_500() {
        let response = app().oneshot(get("/api/students")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal Server Error");
        assert_eq!(body["error"], "an internal error occurred");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_returns_201_without_password() {
        let app = live_app().await;
        let email = unique_email("post");

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/students", &payload(&email)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["data"]["id"].as_i64().unwrap() > 0);
        assert!(body["data"].get("password").is_none());
        assert_eq!(body["data"]["dob"], "2003-04-09");
        assert!(body["data"]["rollNumber"].as_str().unwrap().starts_with("STU"));

        let response = app
            .oneshot(json_request(Method::POST, "/api/students", &payload(&email)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains(&email));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_student_is_404() {
        let app = live_app().await;
        let response = app.clone().oneshot(get("/api/students/999999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(json_request(
                Method::PUT,
                "/api/students/999999",
                &payload(&unique_email("ghost")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
