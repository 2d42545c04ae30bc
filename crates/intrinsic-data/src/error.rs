//! Error types for statement data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// A value that could not be read as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot coerce {input:?} to a number")]
pub struct CoercionError {
    /// Input text after trimming
    pub input: String,
}

/// Errors that can occur while preparing statement data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Numeric coercion error
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// A required field is absent or unknown
    #[error("Missing data: {field} ({context})")]
    MissingData {
        /// Field that was required
        field: String,
        /// Where the field was required
        context: String,
    },

    /// Statement sources disagree about which periods they describe
    #[error("Alignment error: {0}")]
    Alignment(String),

    /// Date string that is not `YYYY-MM-DD`
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Payload shape error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataError {
    pub(crate) fn missing(field: &str, context: impl Into<String>) -> Self {
        Self::MissingData {
            field: field.to_string(),
            context: context.into(),
        }
    }
}
