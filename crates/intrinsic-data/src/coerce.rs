//! Numeric coercion of provider values.
//!
//! Market-data payloads report every figure as text: thousands separators,
//! currency symbols and the literal `"None"` all occur. Coercion keeps three
//! outcomes apart:
//!
//! - a parsed number,
//! - the `"None"` sentinel, which the provider uses for "nothing reported" and
//!   which counts as zero,
//! - anything else (unparseable text, JSON `null`), which is unknown and must
//!   never be read as zero.

use crate::error::CoercionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Literal the provider reports for an empty line item.
pub const NONE_SENTINEL: &str = "None";

/// Outcome of coercing one raw value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Amount {
    /// A finite number
    Value(f64),
    /// The `"None"` sentinel, read as zero
    ZeroSentinel,
    /// Null or unparseable
    Missing,
}

impl Amount {
    /// Coerce a text value, stripping `,` and `$` before parsing.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed == NONE_SENTINEL {
            return Self::ZeroSentinel;
        }

        let cleaned: String = trimmed.chars().filter(|c| !matches!(c, ',' | '$')).collect();
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Value(v),
            _ => Self::Missing,
        }
    }

    /// Coerce a JSON value. Numbers pass through, strings go through [`Amount::parse`].
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map_or(Self::Missing, Self::Value),
            Value::String(s) => Self::parse(s),
            _ => Self::Missing,
        }
    }

    /// Numeric reading: the sentinel is zero, missing stays unknown.
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::ZeroSentinel => Some(0.0),
            Self::Missing => None,
        }
    }

    /// Whether the value is unknown.
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Parse a provider string as a float.
///
/// `"None"` yields `0.0`; text that is not a number after stripping
/// separators and currency symbols is an error.
///
/// # Examples
///
/// ```
/// use intrinsic_data::coerce::to_float;
///
/// assert_eq!(to_float("$1,234.50").unwrap(), 1234.5);
/// assert_eq!(to_float("None").unwrap(), 0.0);
/// assert!(to_float("abc").is_err());
/// ```
pub fn to_float(input: &str) -> Result<f64, CoercionError> {
    Amount::parse(input).value().ok_or_else(|| CoercionError {
        input: input.trim().to_string(),
    })
}

/// JSON counterpart of [`to_float`].
pub fn coerce_json(value: &Value) -> Result<f64, CoercionError> {
    Amount::from_json(value).value().ok_or_else(|| CoercionError {
        input: match value {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        },
    })
}
