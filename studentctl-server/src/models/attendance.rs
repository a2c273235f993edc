//! Attendance input validation and the present-percentage rule

use chrono::NaiveDate;
use serde::Deserialize;

use super::dates::optional_date;
use super::lenient;
use super::validation::{positive_id, required};
use super::ValidationError;

/// Status value counted as attended.
pub const PRESENT: &str = "Present";

/// Attendance payload as sent by clients
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    #[serde(default, deserialize_with = "lenient::number")]
    pub student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub subject_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_date")]
    pub attendance_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Attendance mark keyed by (student, subject, date)
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub student_id: i32,
    pub subject_id: i32,
    pub attendance_date: NaiveDate,
    pub status: String,
}

impl AttendanceInput {
    pub fn validate(self) -> Result<NewAttendance, ValidationError> {
        Ok(NewAttendance {
            student_id: positive_id("Student ID", self.student_id)?,
            subject_id: positive_id("Subject ID", self.subject_id)?,
            attendance_date: self.attendance_date.ok_or(ValidationError::Required {
                field: "Attendance date",
            })?,
            status: required("Status", self.status)?,
        })
    }
}

/// `100 × present / total`, 0.0 for an empty group.
pub fn attendance_percentage(present: i64, total: i64) -> f64 {
    if total > 0 {
        present as f64 * 100.0 / total as f64
    } else {
        0.0
    }
}
