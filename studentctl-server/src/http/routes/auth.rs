//! Student self-service authentication
//!
//! Accounts created by an administrator hold the default password until the
//! student registers by choosing their own.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::today;
use crate::db::repos::{Student, StudentRepo};
use crate::http::envelope::Reply;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery};
use crate::http::state::AppState;
use crate::models::{StudentInput, DEFAULT_PASSWORD};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_roll: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationQuery {
    pub email_or_roll: Option<String>,
}

/// Login and registration payload
#[derive(Debug, Serialize)]
pub struct StudentSession {
    pub student: Student,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatus {
    pub is_registered: bool,
    pub student_id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    pub course: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

/// POST /student/auth/login - by email or roll number
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Reply<StudentSession>, ApiError> {
    let email_or_roll = req
        .email_or_roll
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let password = req.password.as_deref().filter(|p| !p.trim().is_empty());
    let (Some(email_or_roll), Some(password)) = (email_or_roll, password) else {
        return Err(ApiError::BadRequest(
            "Email/Roll number and password are required".to_string(),
        ));
    };

    let repo = StudentRepo::new(state.pool());
    let Some(credentials) = repo.find_credentials(email_or_roll).await? else {
        tracing::warn!("Login attempt for unknown account");
        return Err(invalid_credentials());
    };
    if !state.verify_password(password, &credentials.password).await? {
        tracing::warn!(id = credentials.id, "Login attempt with wrong password");
        return Err(invalid_credentials());
    }

    let student = repo
        .get(credentials.id)
        .await?
        .ok_or_else(invalid_credentials)?;
    tracing::info!(id = student.id, "Student logged in");
    Ok(Reply::ok(StudentSession { student }, "Login successful"))
}

/// POST /student/auth/register - self-registration with a chosen password
async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StudentInput>,
) -> Result<Reply<StudentSession>, ApiError> {
    let student = input.validate_registration(today())?;
    let repo = StudentRepo::new(state.pool());

    if repo.email_exists(student.email.as_str(), None).await? {
        return Err(ApiError::Conflict(format!(
            "Email already exists: {}",
            student.email.as_str()
        )));
    }

    let password = student.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
    let hash = state.hash_password(password).await?;
    let created = repo.create(&student, &hash, Utc::now()).await?;

    Ok(Reply::created(
        StudentSession { student: created },
        "Registration successful",
    ))
}

/// GET /student/auth/check-registration?emailOrRoll=
///
/// An account is registered once its password differs from the default.
async fn check_registration(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RegistrationQuery>,
) -> Result<Reply<RegistrationStatus>, ApiError> {
    let Some(email_or_roll) = query
        .email_or_roll
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Err(ApiError::BadRequest(
            "Email or roll number is required".to_string(),
        ));
    };

    let credentials = StudentRepo::new(state.pool())
        .find_credentials(email_or_roll)
        .await?
        .ok_or_else(|| ApiError::not_found("Student", email_or_roll))?;
    let is_default = state
        .verify_password(DEFAULT_PASSWORD, &credentials.password)
        .await?;

    Ok(Reply::ok(
        RegistrationStatus {
            is_registered: !is_default,
            student_id: credentials.id,
            name: credentials.name,
            email: credentials.email,
            roll_number: credentials.roll_number,
            course: credentials.course,
        },
        "Registration status checked",
    ))
}

/// Student auth routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/student/auth/login", post(login))
        .route("/student/auth/register", post(register))
        .route("/student/auth/check-registration", get(check_registration))
}
