//! Route handlers organized by resource

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod marks;
pub mod students;
pub mod subjects;

use chrono::{NaiveDate, Utc};

/// Today's date in UTC, the reference for future-date checks.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
