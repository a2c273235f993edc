//! Validation error types

use std::fmt;

/// Validation error for request models
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field is missing or blank
    Required { field: &'static str },

    /// String doesn't match required format (e.g., email)
    InvalidFormat { field: &'static str },

    /// Numeric field outside its allowed range
    OutOfRange { field: &'static str, reason: &'static str },

    /// Date lies after today
    FutureDate { field: &'static str },

    /// Two optional fields must be given together
    Incomplete { fields: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::InvalidFormat { field } => write!(f, "Invalid {} format", field),
            Self::OutOfRange { field, reason } => write!(f, "{} {}", field, reason),
            Self::FutureDate { field } => write!(f, "{} cannot be in the future", field),
            Self::Incomplete { fields } => write!(f, "{} must be provided together", fields),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim a required string field, rejecting missing or blank values.
pub(crate) fn required(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_owned()),
        _ => Err(ValidationError::Required { field }),
    }
}

/// Trim an optional string field; blank collapses to `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Require a positive foreign-key style id.
pub(crate) fn positive_id(field: &'static str, value: Option<i32>) -> Result<i32, ValidationError> {
    match value {
        Some(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::Required { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::Required { field: "Name" }.to_string(),
            "Name is required"
        );
        assert_eq!(
            ValidationError::InvalidFormat { field: "email" }.to_string(),
            "Invalid email format"
        );
        assert_eq!(
            ValidationError::FutureDate { field: "Date of birth" }.to_string(),
            "Date of birth cannot be in the future"
        );
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("Name", Some("  Alice ".into())).unwrap(), "Alice");
        assert!(required("Name", Some("   ".into())).is_err());
        assert!(required("Name", None).is_err());
    }

    #[test]
    fn optional_collapses_blank() {
        assert_eq!(optional(Some(" Pune ".into())), Some("Pune".into()));
        assert_eq!(optional(Some("".into())), None);
        assert_eq!(optional(None), None);
    }

    #[test]
    fn positive_id_rejects_zero() {
        assert_eq!(positive_id("Student ID", Some(3)).unwrap(), 3);
        assert!(positive_id("Student ID", Some(0)).is_err());
        assert!(positive_id("Student ID", None).is_err());
    }
}
