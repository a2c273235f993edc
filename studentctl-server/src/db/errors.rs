//! Database error type shared by all repositories

use thiserror::Error;

/// Storage failure surfaced by a repository call.
///
/// Constraint violations are classified so handlers can map them to client
/// errors; everything else is an opaque persistence failure.
#[derive(Error, Debug)]
pub enum DbError {
    /// Unique constraint violation (e.g. duplicate email or roll number)
    #[error("unique constraint violation: {}", constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation { constraint: Option<String> },

    /// Referenced student or subject does not exist
    #[error("foreign key violation: {}", constraint.as_deref().unwrap_or("unknown"))]
    ForeignKeyViolation { constraint: Option<String> },

    /// Any other driver, pool or connection failure
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().map(str::to_owned);
            if db_err.is_unique_violation() {
                return DbError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return DbError::ForeignKeyViolation { constraint };
            }
        }
        DbError::Sqlx(err)
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
