//! Fiscal periods: one merged reporting period, historical or forecast.

use crate::statement::fields;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reporting period of a company.
///
/// Historical periods are produced by the statement merger; forecast periods
/// are appended by the forecast splicer. The derived cash-flow fields start
/// empty and are filled in by the valuation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal period end date
    pub fiscal_date: NaiveDate,
    /// Reporting currency code
    pub reported_currency: String,
    /// Coerced statement line items; `None` marks an unknown value
    pub line_items: BTreeMap<String, Option<f64>>,
    /// Total current assets minus total current liabilities
    pub working_capital: Option<f64>,
    /// Change in working capital against the preceding fiscal year
    pub change_in_working_capital: Option<f64>,
    /// Dividends paid
    pub dividends_paid: Option<f64>,
    /// Set for periods taken from reported statements
    pub is_historical: bool,
    /// Operating cash flow minus capital expenditures
    pub free_cash_flow: Option<f64>,
    /// Whole years between this period and the discounting base year
    pub years_in_future: Option<i32>,
    /// Free cash flow discounted to the base year
    pub present_value_of_fcf: Option<f64>,
}

impl FiscalPeriod {
    /// Create a historical period with no derived fields.
    pub fn historical(
        fiscal_date: NaiveDate,
        reported_currency: impl Into<String>,
        line_items: BTreeMap<String, Option<f64>>,
    ) -> Self {
        Self {
            fiscal_year: fiscal_date.year(),
            fiscal_date,
            reported_currency: reported_currency.into(),
            line_items,
            working_capital: None,
            change_in_working_capital: None,
            dividends_paid: None,
            is_historical: true,
            free_cash_flow: None,
            years_in_future: None,
            present_value_of_fcf: None,
        }
    }

    /// Create a forecast period carrying only the two cash-flow figures.
    pub fn forecast(
        fiscal_date: NaiveDate,
        reported_currency: impl Into<String>,
        operating_cash_flow: f64,
        capital_expenditures: f64,
    ) -> Self {
        let line_items = BTreeMap::from([
            (fields::OPERATING_CASHFLOW.to_string(), Some(operating_cash_flow)),
            (
                fields::CAPITAL_EXPENDITURES.to_string(),
                Some(capital_expenditures),
            ),
        ]);

        Self {
            is_historical: false,
            ..Self::historical(fiscal_date, reported_currency, line_items)
        }
    }

    /// Value of a line item; `None` when absent or unknown.
    pub fn item(&self, key: &str) -> Option<f64> {
        self.line_items.get(key).copied().flatten()
    }

    /// Operating cash flow.
    pub fn operating_cash_flow(&self) -> Option<f64> {
        self.item(fields::OPERATING_CASHFLOW)
    }

    /// Capital expenditures.
    pub fn capital_expenditures(&self) -> Option<f64> {
        self.item(fields::CAPITAL_EXPENDITURES)
    }

    /// Total liabilities.
    pub fn total_liabilities(&self) -> Option<f64> {
        self.item(fields::TOTAL_LIABILITIES)
    }

    /// Cash and cash equivalents.
    pub fn cash_and_equivalents(&self) -> Option<f64> {
        self.item(fields::CASH_AND_EQUIVALENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_period_shape() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();
        let period = FiscalPeriod::forecast(date, "USD", 133.1, 26.62);

        assert!(!period.is_historical);
        assert_eq!(period.fiscal_year, 2025);
        assert_eq!(period.operating_cash_flow(), Some(133.1));
        assert_eq!(period.capital_expenditures(), Some(26.62));
        assert_eq!(period.total_liabilities(), None);
        assert_eq!(period.working_capital, None);
        assert_eq!(period.free_cash_flow, None);
    }

    #[test]
    fn test_unknown_item_reads_as_none() {
        let date = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        let items = BTreeMap::from([(fields::TOTAL_LIABILITIES.to_string(), None)]);
        let period = FiscalPeriod::historical(date, "USD", items);

        assert!(period.is_historical);
        assert_eq!(period.total_liabilities(), None);
        assert_eq!(period.item("doesNotExist"), None);
    }
}
