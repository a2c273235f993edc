//! Date and timestamp wire formats
//!
//! Pure dates travel as `yyyy-MM-dd`, timestamps as `yyyy-MM-ddTHH:mm:ssZ`
//! (UTC, second precision). Neither is ever sent as a numeric epoch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Serialize a UTC timestamp as `yyyy-MM-ddTHH:mm:ssZ`.
pub fn timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

/// Deserialize an optional `yyyy-MM-dd` date, treating `""` as absent.
///
/// Browser forms submit empty strings for untouched date inputs.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid date '{}', expected yyyy-MM-dd", s))),
    }
}
