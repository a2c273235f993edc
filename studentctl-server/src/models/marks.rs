//! Marks input validation

use chrono::NaiveDate;
use serde::Deserialize;

use super::dates::optional_date;
use super::lenient;
use super::validation::{optional, positive_id};
use super::ValidationError;

/// Marks payload as sent by clients
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksInput {
    #[serde(default, deserialize_with = "lenient::number")]
    pub student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub subject_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub marks_obtained: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_marks: Option<f64>,
    pub exam_type: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub exam_date: Option<NaiveDate>,
}

/// Score fields shared by create and update
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub exam_type: Option<String>,
    pub exam_date: Option<NaiveDate>,
}

/// Marks entry ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarks {
    pub student_id: i32,
    pub subject_id: i32,
    pub score: Score,
}

impl MarksInput {
    /// Validate a new entry: both references and a valid score.
    pub fn validate(self) -> Result<NewMarks, ValidationError> {
        let student_id = positive_id("Student ID", self.student_id)?;
        let subject_id = positive_id("Subject ID", self.subject_id)?;
        let score = self.validate_score()?;
        Ok(NewMarks {
            student_id,
            subject_id,
            score,
        })
    }

    /// Validate the score fields only. Updates never move an entry to a
    /// different student or subject, so the ids are ignored here.
    pub fn validate_score(self) -> Result<Score, ValidationError> {
        let marks_obtained = self.marks_obtained.ok_or(ValidationError::Required {
            field: "Marks obtained",
        })?;
        if !marks_obtained.is_finite() || marks_obtained < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "Marks obtained",
                reason: "must not be negative",
            });
        }

        let total_marks = self.total_marks.ok_or(ValidationError::Required {
            field: "Total marks",
        })?;
        if !total_marks.is_finite() || total_marks <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "Total marks",
                reason: "must be greater than zero",
            });
        }

        Ok(Score {
            marks_obtained,
            total_marks,
            exam_type: optional(self.exam_type),
            exam_date: self.exam_date,
        })
    }
}

/// `marks_obtained / total_marks × 100`.
///
/// Stored rows always have a positive total, so the guard only matters for
/// hand-built values.
pub fn percentage(marks_obtained: f64, total_marks: f64) -> f64 {
    if total_marks > 0.0 {
        marks_obtained / total_marks * 100.0
    } else {
        0.0
    }
}
