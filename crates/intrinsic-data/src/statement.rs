//! Raw financial statement rows.
//!
//! A row is one reporting period of one statement (income statement, balance
//! sheet or cash flow) exactly as the market-data provider delivered it: a
//! flat mapping from line-item name to a JSON value, usually a string.

use crate::coerce::{Amount, coerce_json};
use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Line-item names used by the annual statement payloads.
pub mod fields {
    /// Fiscal period end date, `YYYY-MM-DD`
    pub const FISCAL_DATE_ENDING: &str = "fiscalDateEnding";

    /// Reporting currency code
    pub const REPORTED_CURRENCY: &str = "reportedCurrency";

    /// Operating cash flow
    pub const OPERATING_CASHFLOW: &str = "operatingCashflow";

    /// Capital expenditures
    pub const CAPITAL_EXPENDITURES: &str = "capitalExpenditures";

    /// Total current assets
    pub const TOTAL_CURRENT_ASSETS: &str = "totalCurrentAssets";

    /// Total current liabilities
    pub const TOTAL_CURRENT_LIABILITIES: &str = "totalCurrentLiabilities";

    /// Total non-current liabilities
    pub const TOTAL_NON_CURRENT_LIABILITIES: &str = "totalNonCurrentLiabilities";

    /// Total liabilities
    pub const TOTAL_LIABILITIES: &str = "totalLiabilities";

    /// Cash and cash equivalents
    pub const CASH_AND_EQUIVALENTS: &str = "cashAndCashEquivalentsAtCarryingValue";

    /// Dividends paid
    pub const DIVIDEND_PAYOUT: &str = "dividendPayout";

    /// Columns that identify a row and are never coerced
    pub const IDENTIFIERS: [&str; 2] = [FISCAL_DATE_ENDING, REPORTED_CURRENCY];
}

/// The three statements a valuation is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement
    IncomeStatement,
    /// Balance sheet
    BalanceSheet,
    /// Cash flow statement
    CashFlow,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IncomeStatement => "income statement",
            Self::BalanceSheet => "balance sheet",
            Self::CashFlow => "cash flow",
        };
        f.write_str(name)
    }
}

/// Order in which a statement source lists its rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrder {
    /// Newest period first, as annual-report payloads are delivered
    #[default]
    MostRecentFirst,
    /// Oldest period first
    OldestFirst,
}

impl fmt::Display for SourceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MostRecentFirst => f.write_str("most recent first"),
            Self::OldestFirst => f.write_str("oldest first"),
        }
    }
}

/// One period of one financial statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementRow {
    fields: BTreeMap<String, Value>,
}

impl StatementRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from a JSON object.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(DataError::Parse(format!(
                "statement row must be an object, got {other}"
            ))),
        }
    }

    /// Set a field, returning the row.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Raw value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether the row has a field, regardless of its value.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Coerced value of a field; `None` when absent or unknown.
    pub fn amount(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| Amount::from_json(v).value())
    }

    /// Period end date.
    pub fn fiscal_date(&self) -> Result<NaiveDate> {
        let raw = self
            .get(fields::FISCAL_DATE_ENDING)
            .and_then(Value::as_str)
            .ok_or_else(|| DataError::missing(fields::FISCAL_DATE_ENDING, "statement row"))?;

        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| DataError::InvalidDate(raw.to_string()))
    }

    /// Fiscal year, the year part of the period end date.
    pub fn fiscal_year(&self) -> Result<i32> {
        Ok(self.fiscal_date()?.year())
    }

    /// Reporting currency, when present.
    pub fn reported_currency(&self) -> Option<&str> {
        self.get(fields::REPORTED_CURRENCY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Every non-identifier field, coerced.
    pub fn line_items(&self) -> BTreeMap<String, Option<f64>> {
        self.fields
            .iter()
            .filter(|(key, _)| !fields::IDENTIFIERS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), Amount::from_json(value).value()))
            .collect()
    }
}

impl From<Map<String, Value>> for StatementRow {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().collect(),
        }
    }
}

/// Everything the provider reports for one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyStatements {
    /// Ticker symbol
    pub symbol: String,
    /// Income statement rows
    pub income_statement: Vec<StatementRow>,
    /// Balance sheet rows
    pub balance_sheet: Vec<StatementRow>,
    /// Cash flow rows
    pub cash_flow: Vec<StatementRow>,
    /// Shares outstanding from the company overview
    pub shares_outstanding: u64,
}

impl CompanyStatements {
    /// Rows of one statement.
    pub fn rows(&self, kind: StatementKind) -> &[StatementRow] {
        match kind {
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }
}

/// Parse an annual-report payload (`{"symbol": .., "annualReports": [..]}`).
///
/// Rows come back in payload order, which for this provider is most recent
/// first.
pub fn parse_annual_reports(payload: &str) -> Result<Vec<StatementRow>> {
    let value: Value = serde_json::from_str(payload)?;
    let reports = value
        .get("annualReports")
        .and_then(Value::as_array)
        .ok_or_else(|| DataError::Parse("payload has no annualReports array".to_string()))?;

    reports.iter().cloned().map(StatementRow::from_json).collect()
}

/// Read `SharesOutstanding` from a company overview payload.
///
/// An absent or null field yields 0.
pub fn parse_shares_outstanding(payload: &str) -> Result<u64> {
    let value: Value = serde_json::from_str(payload)?;
    let shares = match value.get("SharesOutstanding") {
        None | Some(Value::Null) => return Ok(0),
        Some(raw) => coerce_json(raw)?,
    };

    if shares < 0.0 || shares.fract() != 0.0 || shares >= u64::MAX as f64 {
        return Err(DataError::Parse(format!(
            "SharesOutstanding must be a non-negative whole number below 2^64, got {shares}"
        )));
    }

    Ok(shares as u64)
}
