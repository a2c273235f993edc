//! Database layer - connection pool, migrations and repositories
//!
//! - One injected pool, no process-wide singleton
//! - List operations join subjects and students, never N+1
//! - Uniqueness is enforced by constraints; violations are classified in `DbError`

pub mod errors;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use errors::{DbError, Result};
pub use pool::{
    Database, PoolConfig, PoolStats, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_IDLE_TIMEOUT,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_LIFETIME, DEFAULT_MIN_CONNECTIONS,
};
pub use repos::*;
