//! HTTP server layer
//!
//! Axum server with:
//! - Envelope responses for success and failure
//! - Origin-reflecting CORS
//! - Request tracing
//! - Graceful shutdown

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod state;

pub use envelope::{Envelope, Reply};
pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use axum::response::Response;
    use axum::Router;
    use serde_json::Value;

    use super::{build_router, AppState, ServerConfig};
    use crate::auth::password::test_support::cheap;
    use crate::db::pool::test_support::{migrated, unreachable};

    /// Router over a pool that can never connect. Every request that reaches
    /// storage fails with 500; everything rejected earlier is testable.
    pub fn app() -> Router {
        let state = AppState::with_password_params(unreachable(), cheap());
        build_router(state, &ServerConfig::default())
    }

    /// Router over the migrated `DATABASE_URL` database.
    pub async fn live_app() -> Router {
        let state = AppState::with_password_params(migrated().await, cheap());
        build_router(state, &ServerConfig::default())
    }

    pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    pub async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
