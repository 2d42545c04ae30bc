//! End-to-end valuation of one company.
//!
//! Raw statement rows and already-resolved forecast inputs go in, a
//! [`ValuationSummary`] comes out. Nothing here fetches data or touches the
//! filesystem.

use intrinsic_data::{CompanyStatements, MergedHistory, StatementKind, merge_statements};
use intrinsic_dcf::{DcfConfig, DcfModel, ForecastInputs, Result, ValuationInputs};
use intrinsic_output::ValuationSummary;

/// Merge a company's three statements into per-year history.
///
/// Rows beyond the shortest statement are dropped with a warning.
pub fn merge_history(statements: &CompanyStatements, config: &DcfConfig) -> Result<MergedHistory> {
    let kinds = [
        StatementKind::IncomeStatement,
        StatementKind::BalanceSheet,
        StatementKind::CashFlow,
    ];
    let shortest = kinds
        .iter()
        .map(|&kind| statements.rows(kind).len())
        .min()
        .unwrap_or_default();

    for kind in kinds {
        let rows = statements.rows(kind).len();
        if rows > shortest {
            tracing::warn!(
                "{}: dropping {} oldest {} rows to match {} periods",
                statements.symbol,
                rows - shortest,
                kind,
                shortest
            );
        }
    }

    let history = merge_statements(
        &statements.income_statement,
        &statements.balance_sheet,
        &statements.cash_flow,
        config.source_order,
    )?;

    Ok(history)
}

/// Value one company from its statements and a forecast.
///
/// The configured source order applies to all three statements. Fails on
/// the first error in any stage; no partial valuation is returned.
pub fn value_company(
    statements: &CompanyStatements,
    forecast: &ForecastInputs,
    config: &DcfConfig,
) -> Result<ValuationSummary> {
    tracing::info!(
        "Starting DCF valuation for {} ({} forecast years)",
        statements.symbol,
        forecast.operating_cash_flow.len()
    );

    let history = merge_history(statements, config)?;
    tracing::debug!(
        "{}: merged {} fiscal years {:?}",
        statements.symbol,
        history.len(),
        history.years().collect::<Vec<_>>()
    );

    if statements.shares_outstanding == 0 {
        tracing::warn!(
            "{}: no shares outstanding, per-share value will be 0",
            statements.symbol
        );
    }

    let model = DcfModel::new(config.clone());
    let inputs = ValuationInputs::assemble(
        history,
        forecast,
        statements.shares_outstanding,
        model.config(),
    )?;
    let result = model.run(inputs)?;

    tracing::info!(
        "{}: intrinsic value {:.2} per share",
        statements.symbol,
        result.per_share_value
    );

    Ok(ValuationSummary::new(statements.symbol.clone(), result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use intrinsic_data::{ForecastSeries, SourceOrder, StatementRow, fields};
    use intrinsic_dcf::ValuationError;

    fn row(date: &str) -> StatementRow {
        StatementRow::new()
            .with(fields::FISCAL_DATE_ENDING, date)
            .with(fields::REPORTED_CURRENCY, "USD")
    }

    fn company() -> CompanyStatements {
        let dates = ["2023-12-31", "2022-12-31"];
        CompanyStatements {
            symbol: "ACME".to_string(),
            income_statement: dates.iter().map(|d| row(d)).collect(),
            balance_sheet: dates
                .iter()
                .map(|d| {
                    row(d)
                        .with(fields::TOTAL_LIABILITIES, "500")
                        .with(fields::CASH_AND_EQUIVALENTS, "50")
                })
                .collect(),
            cash_flow: dates
                .iter()
                .map(|d| {
                    row(d)
                        .with(fields::OPERATING_CASHFLOW, "100")
                        .with(fields::CAPITAL_EXPENDITURES, "20")
                })
                .collect(),
            shares_outstanding: 10,
        }
    }

    #[test]
    fn test_merge_history_truncates_to_shortest() {
        let mut statements = company();
        statements.income_statement.push(row("2021-12-31"));

        let history = merge_history(&statements, &DcfConfig::default()).unwrap();
        assert_eq!(history.years().collect::<Vec<_>>(), vec![2022, 2023]);
    }

    #[test]
    fn test_value_company() {
        let forecast = ForecastInputs::new(
            ForecastSeries::from_values(2024, [110.0]),
            ForecastSeries::from_values(2024, [10.0]),
            0.10,
            0.0,
        );

        let summary = value_company(&company(), &forecast, &DcfConfig::default()).unwrap();

        assert_eq!(summary.symbol, "ACME");
        assert_eq!(summary.currency, "USD");
        // EV 1100, net debt 450, debt 500
        assert!((summary.per_share_value() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_source_order_is_an_alignment_error() {
        let forecast = ForecastInputs::new(ForecastSeries::new(), ForecastSeries::new(), 0.1, 0.0);
        let config = DcfConfig::default().with_source_order(SourceOrder::OldestFirst);

        assert!(matches!(
            value_company(&company(), &forecast, &config),
            Err(ValuationError::Alignment(_))
        ));
    }
}
