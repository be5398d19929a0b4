use crate::domain::digits::NormalizedDigits;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A borrower field as it was persisted: legacy rows hold either a number or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Integer(i64),
    Text(String),
}

impl StoredValue {
    /// Digit-only form of the value. Both variants go through the same textual
    /// normalization, so `Integer(42)` and `Text("42")` agree.
    pub fn digits(&self) -> NormalizedDigits {
        match self {
            StoredValue::Integer(value) => NormalizedDigits::from_text(&value.to_string()),
            StoredValue::Text(value) => NormalizedDigits::from_text(value),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            StoredValue::Integer(_) => "integer",
            StoredValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Integer(value) => write!(f, "{value}"),
            StoredValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Integer(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}
