// Persistent records and the forms that create or change them

pub mod exercise;
pub mod favorite;
pub mod profile;
pub mod progress;
pub mod routine;
pub mod user;
pub mod workout;

pub use exercise::*;
pub use favorite::*;
pub use profile::*;
pub use progress::*;
pub use routine::*;
pub use user::*;
pub use workout::*;

use std::fmt::Display;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

/// Stored text that does not name a known enum variant.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Form fields left blank deserialize as `None` instead of failing to parse.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// HTML checkboxes send "on" when ticked and nothing otherwise.
pub fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(matches!(
        raw.as_deref().map(str::trim),
        Some("on") | Some("true") | Some("1") | Some("yes")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "empty_as_none")]
        weight: Option<f64>,
        #[serde(default, deserialize_with = "checkbox")]
        public: bool,
    }

    #[test]
    fn test_blank_fields_become_none() {
        let sample: Sample =
            serde_json::from_value(serde_json::json!({"weight": "", "public": "on"})).unwrap();
        assert_eq!(sample.weight, None);
        assert!(sample.public);

        let sample: Sample = serde_json::from_value(serde_json::json!({"weight": "72.5"})).unwrap();
        assert_eq!(sample.weight, Some(72.5));
        assert!(!sample.public);
    }

    #[test]
    fn test_unparseable_numbers_are_rejected() {
        let parsed = serde_json::from_value::<Sample>(serde_json::json!({"weight": "mucho"}));
        assert!(parsed.is_err());
    }
}
