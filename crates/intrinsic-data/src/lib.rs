#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intrinsic/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coerce;
pub mod error;
pub mod forecast;
pub mod history;
pub mod period;
pub mod statement;

pub use coerce::{Amount, coerce_json, to_float};
pub use error::{CoercionError, DataError, Result};
pub use forecast::{ForecastSeries, parse_rate};
pub use history::{MergedHistory, merge_statements};
pub use period::FiscalPeriod;
pub use statement::{
    CompanyStatements, SourceOrder, StatementKind, StatementRow, fields, parse_annual_reports,
    parse_shares_outstanding,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
