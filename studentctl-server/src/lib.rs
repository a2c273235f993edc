//! studentctl-server: student records over PostgreSQL and JSON
//!
//! Students, subjects, marks and attendance stored in PostgreSQL and served
//! as REST endpoints under `/api`, wrapped in a uniform response envelope.
//!
//! # Layers
//!
//! - [`models`]: request payloads, validated on conversion
//! - [`db`]: connection pool, migrations and one repository per entity
//! - [`auth`]: password hashing
//! - [`http`]: axum routers, envelope and error mapping

pub mod auth;
pub mod db;
pub mod http;
pub mod models;

pub use db::{Database, PoolConfig};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
