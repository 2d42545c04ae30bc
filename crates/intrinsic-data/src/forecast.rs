//! Externally estimated forecast inputs.
//!
//! Forecasts come from an outside estimator as text: a JSON object mapping
//! year labels to values, often wrapped in Markdown code fences, and bare
//! decimals for the discount and growth rates.

use crate::coerce::{coerce_json, to_float};
use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Forecast values for one line item, keyed by fiscal year.
///
/// Iteration is always in ascending year order, whatever order the source
/// listed the years in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastSeries {
    values: BTreeMap<i32, f64>,
}

impl ForecastSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive yearly values starting at `first_year`.
    pub fn from_values(first_year: i32, values: impl IntoIterator<Item = f64>) -> Self {
        (first_year..).zip(values).collect()
    }

    /// Parse an estimator response such as `{"2024": 1.5e11, "2025": "1.6e11"}`.
    ///
    /// Backticks and a leading `json` fence tag are stripped first. Keys must
    /// be integer years and values must coerce to numbers.
    pub fn from_response(response: &str) -> Result<Self> {
        let body = strip_fences(response);
        let value: Value = serde_json::from_str(&body)?;
        let Value::Object(entries) = value else {
            return Err(DataError::Parse(format!(
                "forecast must be a JSON object, got {body}"
            )));
        };

        let mut series = Self::new();
        for (label, raw) in &entries {
            let year = label
                .trim()
                .parse::<i32>()
                .map_err(|_| DataError::Parse(format!("forecast key {label:?} is not a year")))?;
            series.insert(year, coerce_json(raw)?);
        }

        Ok(series)
    }

    /// Set the value for a year.
    pub fn insert(&mut self, year: i32, value: f64) {
        self.values.insert(year, value);
    }

    /// Value for a year.
    pub fn get(&self, year: i32) -> Option<f64> {
        self.values.get(&year).copied()
    }

    /// Years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.keys().copied()
    }

    /// `(year, value)` pairs, ascending by year.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values.iter().map(|(y, v)| (*y, *v))
    }

    /// Number of forecast years.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no years.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether both series cover exactly the same years.
    pub fn same_years(&self, other: &Self) -> bool {
        self.values.keys().eq(other.values.keys())
    }
}

impl FromIterator<(i32, f64)> for ForecastSeries {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parse a rate answer: `"0.09"`, `"9%"` or a fenced variant of either.
pub fn parse_rate(response: &str) -> Result<f64> {
    let body = strip_fences(response);
    match body.strip_suffix('%') {
        Some(percent) => Ok(to_float(percent)? / 100.0),
        None => Ok(to_float(&body)?),
    }
}

fn strip_fences(response: &str) -> String {
    let cleaned = response.replace('`', "");
    let trimmed = cleaned.trim();
    trimmed
        .strip_prefix("json")
        .or_else(|| trimmed.strip_prefix("JSON"))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
