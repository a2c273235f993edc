//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use super::error::ApiError;
use crate::auth::{self, Argon2Params};
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Database,
    password_params: Argon2Params,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::with_password_params(db, Argon2Params::default())
    }

    pub fn with_password_params(db: Database, password_params: Argon2Params) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                password_params,
            }),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn pool(&self) -> &PgPool {
        self.inner.db.pool()
    }

    /// Hash a password on the blocking pool.
    pub async fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let password = password.to_owned();
        let params = self.inner.password_params;
        let hash = tokio::task::spawn_blocking(move || auth::hash_password(&password, params))
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("password hashing task failed: {e}"),
            })??;
        Ok(hash)
    }

    /// Verify a password against a stored hash on the blocking pool.
    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("password verification task failed: {e}"),
            })
    }
}
