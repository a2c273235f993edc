//! Student input validation
//!
//! Email: `local@domain.tld`, no whitespace.
//! Phone: optional leading `+`, then 1-16 digits not starting with 0.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::dates::optional_date;
use super::validation::{optional, required};
use super::ValidationError;

/// Password given to accounts created without one.
///
/// An account still holding it has not completed registration.
pub const DEFAULT_PASSWORD: &str = "student123";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]?[1-9][0-9]{0,15}$").expect("invalid phone regex"));

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required { field: "Email" });
        }
        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat { field: "email" });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated phone number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required { field: "Phone" });
        }
        if !PHONE_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat { field: "phone" });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Student payload as sent by clients (create, update and register).
///
/// Unknown fields such as `id` or `createdAt` are ignored so a client can
/// send back a record it previously received.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub dob: Option<NaiveDate>,
    pub city: Option<String>,
    pub password: Option<String>,
    pub roll_number: Option<String>,
}

/// A student that passed validation and is ready to persist.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub course: String,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub city: Option<String>,
    /// Plain password; hashed before it reaches storage
    pub password: Option<String>,
    pub roll_number: Option<String>,
}

impl StudentInput {
    /// Validate in the order a form reports problems: name, email, phone,
    /// course, then date of birth against `today`.
    pub fn validate(self, today: NaiveDate) -> Result<NewStudent, ValidationError> {
        let name = required("Name", self.name)?;
        let email = Email::new(self.email.as_deref().unwrap_or_default())?;
        let phone = Phone::new(self.phone.as_deref().unwrap_or_default())?;
        let course = required("Course", self.course)?;

        if let Some(dob) = self.dob {
            if dob > today {
                return Err(ValidationError::FutureDate {
                    field: "Date of birth",
                });
            }
        }

        Ok(NewStudent {
            name,
            email,
            phone,
            course,
            gender: optional(self.gender),
            dob: self.dob,
            city: optional(self.city),
            // Passwords are not trimmed; only an all-blank one counts as absent.
            password: self.password.filter(|p| !p.trim().is_empty()),
            roll_number: optional(self.roll_number),
        })
    }

    /// Self-registration additionally requires a password.
    pub fn validate_registration(self, today: NaiveDate) -> Result<NewStudent, ValidationError> {
        let student = self.validate(today)?;
        if student.password.is_none() {
            return Err(ValidationError::Required { field: "Password" });
        }
        Ok(student)
    }
}
