//! Scalar field values extracted from item tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single attribute or stat value.
///
/// Raw XML attribute strings are coerced with [`FieldValue::coerce`]: numbers
/// become [`FieldValue::Integer`] when they have no fractional part and
/// [`FieldValue::Float`] otherwise; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Coerce a raw attribute string.
    ///
    /// `"3.0"` becomes `3`, `"3.5"` stays `3.5` and `"abc"` stays text.
    /// Non-finite numbers (`"nan"`, `"inf"`) are kept as text so the output
    /// stays valid JSON.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Self::from_f64(number),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Wrap a computed number, collapsing whole numbers to integers.
    pub fn from_f64(number: f64) -> Self {
        if number.fract() == 0.0 && number.abs() < 9.0e15 {
            Self::Integer(number as i64)
        } else {
            Self::Float(number)
        }
    }

    /// Numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// The value as text, `None` for numbers.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
