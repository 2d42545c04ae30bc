//! Historical statement merger.
//!
//! Combines income statement, balance sheet and cash flow rows into one
//! [`FiscalPeriod`] per fiscal year. Rows are joined on their fiscal year,
//! never on their position, so a source that skips or repeats a year is
//! reported instead of silently shifting every later period.

use crate::error::{DataError, Result};
use crate::period::FiscalPeriod;
use crate::statement::{SourceOrder, StatementKind, StatementRow, fields};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Historical periods keyed by fiscal year, ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedHistory {
    periods: BTreeMap<i32, FiscalPeriod>,
}

impl MergedHistory {
    /// Number of periods processed.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether no period could be merged.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Period for a fiscal year.
    pub fn get(&self, fiscal_year: i32) -> Option<&FiscalPeriod> {
        self.periods.get(&fiscal_year)
    }

    /// Fiscal years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.periods.keys().copied()
    }

    /// Periods, ascending by fiscal year.
    pub fn periods(&self) -> impl Iterator<Item = &FiscalPeriod> {
        self.periods.values()
    }

    /// Most recent period.
    pub fn latest(&self) -> Option<&FiscalPeriod> {
        self.periods.values().next_back()
    }

    /// Consume into an ascending period sequence.
    pub fn into_periods(self) -> Vec<FiscalPeriod> {
        self.periods.into_values().collect()
    }

    /// The last `n` fiscal years of one line item, keyed by year label.
    ///
    /// This is the history an external estimator is shown when it is asked
    /// to forecast the same line item.
    pub fn trailing_series(&self, field: &str, n: usize) -> BTreeMap<String, Option<f64>> {
        let skip = self.periods.len().saturating_sub(n);
        self.periods
            .iter()
            .skip(skip)
            .map(|(year, period)| (year.to_string(), period.item(field)))
            .collect()
    }
}

/// Merge the three statement sources into per-year periods.
///
/// Each source must be ordered as `order` says. All sources are cut to the
/// most recent `min(len)` rows and must then cover the same fiscal years.
/// If any source is empty the result is empty.
///
/// For every year the line items of the three rows are coerced and merged
/// (balance sheet over income statement, cash flow over both, on key
/// collision), working capital and its change against the previous year are
/// derived, and dividends paid default to zero when the cash flow row does
/// not report them.
pub fn merge_statements(
    income_statement: &[StatementRow],
    balance_sheet: &[StatementRow],
    cash_flow: &[StatementRow],
    order: SourceOrder,
) -> Result<MergedHistory> {
    if income_statement.is_empty() || balance_sheet.is_empty() || cash_flow.is_empty() {
        return Ok(MergedHistory::default());
    }

    let keep = income_statement
        .len()
        .min(balance_sheet.len())
        .min(cash_flow.len());

    let income = keyed_by_year(income_statement, order, keep, StatementKind::IncomeStatement)?;
    let balance = keyed_by_year(balance_sheet, order, keep, StatementKind::BalanceSheet)?;
    let cash = keyed_by_year(cash_flow, order, keep, StatementKind::CashFlow)?;

    if !income.keys().eq(balance.keys()) || !income.keys().eq(cash.keys()) {
        return Err(DataError::Alignment(format!(
            "statements cover different fiscal years: income statement {:?}, balance sheet {:?}, cash flow {:?}",
            income.keys().collect::<Vec<_>>(),
            balance.keys().collect::<Vec<_>>(),
            cash.keys().collect::<Vec<_>>(),
        )));
    }

    let mut periods = BTreeMap::new();
    let mut previous_working_capital: Option<f64> = None;

    for (year, (_, income_row)) in income {
        let (_, balance_row) = balance[&year];
        let (fiscal_date, cash_row) = cash[&year];

        let balance_items = balance_row.line_items();
        let mut line_items = income_row.line_items();
        line_items.extend(balance_items.clone());
        line_items.extend(cash_row.line_items());

        let currency = [cash_row, balance_row, income_row]
            .into_iter()
            .find_map(StatementRow::reported_currency)
            .ok_or_else(|| {
                DataError::missing(fields::REPORTED_CURRENCY, format!("fiscal year {year}"))
            })?;

        let mut period = FiscalPeriod::historical(fiscal_date, currency, line_items);

        let current_assets = balance_items
            .get(fields::TOTAL_CURRENT_ASSETS)
            .copied()
            .flatten();
        let current_liabilities = balance_items
            .get(fields::TOTAL_CURRENT_LIABILITIES)
            .copied()
            .flatten();
        let working_capital = current_assets
            .zip(current_liabilities)
            .map(|(assets, liabilities)| assets - liabilities);

        period.working_capital = working_capital;
        period.change_in_working_capital = previous_working_capital
            .zip(working_capital)
            .map(|(previous, current)| current - previous);
        previous_working_capital = working_capital;

        period.dividends_paid = if cash_row.contains(fields::DIVIDEND_PAYOUT) {
            cash_row.amount(fields::DIVIDEND_PAYOUT)
        } else {
            Some(0.0)
        };

        periods.insert(year, period);
    }

    Ok(MergedHistory { periods })
}

/// Keep the `keep` most recent rows of a source, keyed by fiscal year.
///
/// Rows outside that window are never read.
fn keyed_by_year(
    rows: &[StatementRow],
    order: SourceOrder,
    keep: usize,
    kind: StatementKind,
) -> Result<BTreeMap<i32, (NaiveDate, &StatementRow)>> {
    let window = match order {
        SourceOrder::MostRecentFirst => &rows[..keep],
        SourceOrder::OldestFirst => &rows[rows.len() - keep..],
    };

    let mut dated = window
        .iter()
        .map(|row| Ok((row.fiscal_date()?, row)))
        .collect::<Result<Vec<_>>>()?;

    let ordered = dated.windows(2).all(|pair| match order {
        SourceOrder::MostRecentFirst => pair[0].0 > pair[1].0,
        SourceOrder::OldestFirst => pair[0].0 < pair[1].0,
    });
    if !ordered {
        return Err(DataError::Alignment(format!(
            "{kind} rows are not strictly ordered {order}"
        )));
    }

    if order == SourceOrder::OldestFirst {
        dated.reverse();
    }

    let mut keyed = BTreeMap::new();
    for (date, row) in dated {
        if keyed.insert(date.year(), (date, row)).is_some() {
            return Err(DataError::Alignment(format!(
                "{kind} reports fiscal year {} more than once",
                date.year()
            )));
        }
    }

    Ok(keyed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn income(date: &str) -> StatementRow {
        StatementRow::new()
            .with(fields::FISCAL_DATE_ENDING, date)
            .with(fields::REPORTED_CURRENCY, "USD")
            .with("totalRevenue", "1000")
    }

    fn balance(date: &str, assets: &str, liabilities: &str) -> StatementRow {
        StatementRow::new()
            .with(fields::FISCAL_DATE_ENDING, date)
            .with(fields::REPORTED_CURRENCY, "USD")
            .with(fields::TOTAL_CURRENT_ASSETS, assets)
            .with(fields::TOTAL_CURRENT_LIABILITIES, liabilities)
            .with(fields::TOTAL_LIABILITIES, "500")
    }

    fn cash(date: &str, ocf: &str, capex: &str) -> StatementRow {
        StatementRow::new()
            .with(fields::FISCAL_DATE_ENDING, date)
            .with(fields::REPORTED_CURRENCY, "USD")
            .with(fields::OPERATING_CASHFLOW, ocf)
            .with(fields::CAPITAL_EXPENDITURES, capex)
    }

    #[test]
    fn test_empty_source_yields_empty_history() {
        let merged = merge_statements(
            &[income("2023-12-31")],
            &[],
            &[cash("2023-12-31", "1", "1")],
            SourceOrder::MostRecentFirst,
        )
        .unwrap();

        assert!(merged.is_empty());
        assert_eq!(merged.len(), 0);
    }

    #[test]
    fn test_merge_derives_working_capital_changes() {
        let merged = merge_statements(
            &[income("2023-12-31"), income("2022-12-31")],
            &[
                balance("2023-12-31", "300", "100"),
                balance("2022-12-31", "250", "120"),
            ],
            &[
                cash("2023-12-31", "121", "24.2"),
                cash("2022-12-31", "110", "22"),
            ],
            SourceOrder::MostRecentFirst,
        )
        .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.years().collect::<Vec<_>>(), vec![2022, 2023]);

        let first = merged.get(2022).unwrap();
        assert_eq!(first.working_capital, Some(130.0));
        assert_eq!(first.change_in_working_capital, None);
        assert_eq!(first.dividends_paid, Some(0.0));

        let second = merged.get(2023).unwrap();
        assert_eq!(second.working_capital, Some(200.0));
        assert_relative_eq!(second.change_in_working_capital.unwrap(), 70.0);
        assert_eq!(second.item("totalRevenue"), Some(1000.0));
        assert_eq!(second.operating_cash_flow(), Some(121.0));
        assert_eq!(merged.latest().unwrap().fiscal_year, 2023);
    }

    #[test]
    fn test_truncates_to_shortest_source() {
        let merged = merge_statements(
            &[
                income("2023-12-31"),
                income("2022-12-31"),
                income("2021-12-31"),
            ],
            &[
                balance("2023-12-31", "1", "1"),
                balance("2022-12-31", "1", "1"),
            ],
            &[
                cash("2023-12-31", "1", "1"),
                cash("2022-12-31", "1", "1"),
                cash("2021-12-31", "1", "1"),
            ],
            SourceOrder::MostRecentFirst,
        )
        .unwrap();

        assert_eq!(merged.years().collect::<Vec<_>>(), vec![2022, 2023]);
    }

    #[test]
    fn test_truncated_rows_are_never_read() {
        let merged = merge_statements(
            &[
                income("2023-12-31"),
                income("2022-12-31"),
                income("not-a-date"),
            ],
            &[
                balance("2023-12-31", "1", "1"),
                balance("2022-12-31", "1", "1"),
            ],
            &[cash("2023-12-31", "1", "1"), cash("2022-12-31", "1", "1")],
            SourceOrder::MostRecentFirst,
        )
        .unwrap();
        assert_eq!(merged.years().collect::<Vec<_>>(), vec![2022, 2023]);

        // oldest first keeps the tail, so an out-of-order head is dropped
        let merged = merge_statements(
            &[
                income("2024-12-31"),
                income("2022-12-31"),
                income("2023-12-31"),
            ],
            &[
                balance("2022-12-31", "1", "1"),
                balance("2023-12-31", "1", "1"),
            ],
            &[cash("2022-12-31", "1", "1"), cash("2023-12-31", "1", "1")],
            SourceOrder::OldestFirst,
        )
        .unwrap();
        assert_eq!(merged.years().collect::<Vec<_>>(), vec![2022, 2023]);
    }

    #[test]
    fn test_oldest_first_sources() {
        let merged = merge_statements(
            &[income("2022-12-31"), income("2023-12-31")],
            &[
                balance("2022-12-31", "1", "1"),
                balance("2023-12-31", "1", "1"),
            ],
            &[cash("2022-12-31", "1", "1"), cash("2023-12-31", "5", "1")],
            SourceOrder::OldestFirst,
        )
        .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.latest().unwrap().operating_cash_flow(), Some(5.0));
    }

    #[test]
    fn test_wrong_declared_order_is_an_alignment_error() {
        let result = merge_statements(
            &[income("2022-12-31"), income("2023-12-31")],
            &[
                balance("2022-12-31", "1", "1"),
                balance("2023-12-31", "1", "1"),
            ],
            &[cash("2022-12-31", "1", "1"), cash("2023-12-31", "1", "1")],
            SourceOrder::MostRecentFirst,
        );

        assert!(matches!(result, Err(DataError::Alignment(_))));
    }

    #[test]
    fn test_mismatched_years_are_an_alignment_error() {
        let result = merge_statements(
            &[income("2023-12-31"), income("2022-12-31")],
            &[
                balance("2023-12-31", "1", "1"),
                balance("2021-12-31", "1", "1"),
            ],
            &[cash("2023-12-31", "1", "1"), cash("2022-12-31", "1", "1")],
            SourceOrder::MostRecentFirst,
        );

        assert!(matches!(result, Err(DataError::Alignment(_))));
    }

    #[test]
    fn test_duplicate_year_is_an_alignment_error() {
        let result = merge_statements(
            &[income("2023-12-31"), income("2023-01-31")],
            &[
                balance("2023-12-31", "1", "1"),
                balance("2023-01-31", "1", "1"),
            ],
            &[cash("2023-12-31", "1", "1"), cash("2023-01-31", "1", "1")],
            SourceOrder::MostRecentFirst,
        );

        assert!(matches!(result, Err(DataError::Alignment(_))));
    }

    #[test]
    fn test_missing_working_capital_inputs_stay_unknown() {
        let merged = merge_statements(
            &[income("2023-12-31"), income("2022-12-31")],
            &[
                balance("2023-12-31", "300", "100"),
                balance("2022-12-31", "abc", "120"),
            ],
            &[
                cash("2023-12-31", "1", "1").with(fields::DIVIDEND_PAYOUT, "None"),
                cash("2022-12-31", "1", "1").with(fields::DIVIDEND_PAYOUT, "-15"),
            ],
            SourceOrder::MostRecentFirst,
        )
        .unwrap();

        let first = merged.get(2022).unwrap();
        assert_eq!(first.working_capital, None);
        assert_eq!(first.dividends_paid, Some(-15.0));

        let second = merged.get(2023).unwrap();
        assert_eq!(second.working_capital, Some(200.0));
        assert_eq!(second.change_in_working_capital, None);
        assert_eq!(second.dividends_paid, Some(0.0));
    }

    #[test]
    fn test_trailing_series() {
        let years = ["2023-12-31", "2022-12-31", "2021-12-31", "2020-12-31"];
        let merged = merge_statements(
            &years.map(income),
            &years.map(|d| balance(d, "1", "1")),
            &[
                cash(years[0], "121", "24.2"),
                cash(years[1], "110", "22"),
                cash(years[2], "100", "20"),
                cash(years[3], "90", "18"),
            ],
            SourceOrder::MostRecentFirst,
        )
        .unwrap();

        let series = merged.trailing_series(fields::OPERATING_CASHFLOW, 3);
        assert_eq!(
            series.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["2021", "2022", "2023"]
        );
        assert_eq!(series["2023"], Some(121.0));
        assert_eq!(
            serde_json::to_string(&merged.trailing_series(fields::CAPITAL_EXPENDITURES, 2))
                .unwrap(),
            r#"{"2022":22.0,"2023":24.2}"#
        );
    }
}
