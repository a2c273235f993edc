//! Health check endpoint

use axum::{extract::State, routing::get, Router};
use serde::Serialize;

use crate::db::PoolStats;
use crate::http::envelope::Reply;
use crate::http::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub connections: PoolStats,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Reply<HealthResponse> {
    let healthy = state.db().is_healthy().await;
    Reply::ok(
        HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            database: if healthy { "up" } else { "down" },
            version: env!("CARGO_PKG_VERSION"),
            connections: state.db().stats(),
        },
        "Service is running",
    )
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
