//! Valuation errors.

use intrinsic_data::DataError;
use thiserror::Error;

/// Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors that stop a valuation.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// A figure needed by a calculation is absent or unknown
    #[error("Missing data: {field}{}", year_suffix(.fiscal_year))]
    MissingData {
        /// Missing field
        field: String,
        /// Fiscal year of the period, if the field belongs to one
        fiscal_year: Option<i32>,
    },

    /// Rates that make the model undefined
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Inputs that disagree about which periods they describe
    #[error("Alignment error: {0}")]
    Alignment(String),

    /// No forecast period to anchor discounting on
    #[error(
        "Index error: {historical_periods} historical periods leave no forecast period among {total_periods}"
    )]
    Index {
        /// Number of historical periods
        historical_periods: usize,
        /// Number of periods in total
        total_periods: usize,
    },

    /// Statement data error
    #[error("Data error: {0}")]
    Data(#[source] DataError),
}

impl ValuationError {
    pub(crate) fn missing(field: &str, fiscal_year: Option<i32>) -> Self {
        Self::MissingData {
            field: field.to_string(),
            fiscal_year,
        }
    }
}

fn year_suffix(fiscal_year: &Option<i32>) -> String {
    fiscal_year.map_or_else(String::new, |year| format!(" for fiscal year {year}"))
}

impl From<DataError> for ValuationError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Alignment(reason) => Self::Alignment(reason),
            DataError::MissingData { field, context } => {
                match context
                    .strip_prefix("fiscal year ")
                    .and_then(|year| year.parse().ok())
                {
                    Some(year) => Self::MissingData {
                        field,
                        fiscal_year: Some(year),
                    },
                    // context without a fiscal year stays readable as a data error
                    None => Self::Data(DataError::MissingData { field, context }),
                }
            }
            other => Self::Data(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_map_onto_valuation_taxonomy() {
        let alignment: ValuationError = DataError::Alignment("years differ".to_string()).into();
        assert!(matches!(alignment, ValuationError::Alignment(_)));

        let missing: ValuationError = DataError::MissingData {
            field: "reportedCurrency".to_string(),
            context: "fiscal year 2023".to_string(),
        }
        .into();
        assert!(matches!(
            missing,
            ValuationError::MissingData {
                fiscal_year: Some(2023),
                ..
            }
        ));
        assert_eq!(
            missing.to_string(),
            "Missing data: reportedCurrency for fiscal year 2023"
        );

        let row: ValuationError = DataError::MissingData {
            field: "fiscalDateEnding".to_string(),
            context: "statement row".to_string(),
        }
        .into();
        assert_eq!(
            row.to_string(),
            "Data error: Missing data: fiscalDateEnding (statement row)"
        );

        let parse: ValuationError = DataError::Parse("bad".to_string()).into();
        assert!(matches!(parse, ValuationError::Data(_)));
    }

    #[test]
    fn test_missing_data_message() {
        let err = ValuationError::missing("operatingCashflow", Some(2025));
        assert_eq!(
            err.to_string(),
            "Missing data: operatingCashflow for fiscal year 2025"
        );
        assert_eq!(
            ValuationError::missing("totalLiabilities", None).to_string(),
            "Missing data: totalLiabilities"
        );
    }
}
