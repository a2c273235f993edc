//! Lenient numeric fields
//!
//! HTML form values arrive as strings (`"3"`, `"42.5"`), so numeric request
//! fields accept either a JSON number or a numeric string. Blank strings
//! count as absent.

use std::fmt::Display;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

/// Deserialize `Option<T>` from a number, a numeric string, `""` or `null`.
pub fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid number '{}': {}", s, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "number")]
        id: Option<i32>,
        #[serde(default, deserialize_with = "number")]
        score: Option<f64>,
    }

    #[test]
    fn accepts_numbers_and_strings() {
        let form: Form = serde_json::from_str(r#"{"id": 3, "score": 42.5}"#).unwrap();
        assert_eq!(form.id, Some(3));
        assert_eq!(form.score, Some(42.5));

        let form: Form = serde_json::from_str(r#"{"id": "3", "score": " 40 "}"#).unwrap();
        assert_eq!(form.id, Some(3));
        assert_eq!(form.score, Some(40.0));
    }

    #[test]
    fn blank_and_missing_are_none() {
        let form: Form = serde_json::from_str(r#"{"id": "", "score": null}"#).unwrap();
        assert!(form.id.is_none());
        assert!(form.score.is_none());

        let form: Form = serde_json::from_str("{}").unwrap();
        assert!(form.id.is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Form>(r#"{"id": "three"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"id": true}"#).is_err());
    }
}
