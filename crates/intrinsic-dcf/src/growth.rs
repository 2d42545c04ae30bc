//! Constant-growth projections.
//!
//! An offline stand-in for an external estimator: project a line item
//! forward from its latest reported value at its average historical growth.

use crate::error::{Result, ValuationError};
use intrinsic_data::{ForecastSeries, MergedHistory};

/// `base * (1 + rate)^k` for `k = 1..=years`.
pub fn project_future_values(base: f64, rate: f64, years: u32) -> Vec<f64> {
    (1..=years)
        .map(|k| base * (1.0 + rate).powi(k as i32))
        .collect()
}

/// Mean period-over-period growth rate.
///
/// Pairs where either neighbour is missing or zero are skipped. With no
/// usable pair the rate is 0.
pub fn average_growth_rate(values: &[Option<f64>]) -> f64 {
    let rates: Vec<f64> = values
        .windows(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) if prev != 0.0 && curr != 0.0 => Some((curr - prev) / prev),
            _ => None,
        })
        .collect();

    if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    }
}

/// Forecast `years` years of `field` after the latest reported year.
pub fn growth_forecast(history: &MergedHistory, field: &str, years: u32) -> Result<ForecastSeries> {
    let latest = history
        .latest()
        .ok_or_else(|| ValuationError::missing(field, None))?;
    let base = latest
        .item(field)
        .ok_or_else(|| ValuationError::missing(field, Some(latest.fiscal_year)))?;

    let series: Vec<Option<f64>> = history.periods().map(|p| p.item(field)).collect();
    let rate = average_growth_rate(&series);

    Ok(ForecastSeries::from_values(
        latest.fiscal_year + 1,
        project_future_values(base, rate, years),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use intrinsic_data::{SourceOrder, StatementRow, fields, merge_statements};
    use rstest::rstest;

    #[test]
    fn test_project_future_values() {
        let values = project_future_values(100.0, 0.1, 3);
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[0], 110.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 121.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 133.1, epsilon = 1e-9);

        assert!(project_future_values(100.0, 0.1, 0).is_empty());
    }

    #[rstest]
    #[case(&[Some(100.0), Some(110.0), Some(121.0)], 0.1)]
    #[case(&[Some(100.0), None, Some(121.0)], 0.0)]
    #[case(&[Some(0.0), Some(50.0), Some(100.0)], 1.0)]
    #[case(&[Some(100.0)], 0.0)]
    #[case(&[], 0.0)]
    fn test_average_growth_rate(#[case] values: &[Option<f64>], #[case] expected: f64) {
        assert_relative_eq!(average_growth_rate(values), expected, epsilon = 1e-9);
    }

    fn row(date: &str, ocf: &str) -> StatementRow {
        StatementRow::new()
            .with(fields::FISCAL_DATE_ENDING, date)
            .with(fields::REPORTED_CURRENCY, "USD")
            .with(fields::OPERATING_CASHFLOW, ocf)
    }

    #[test]
    fn test_growth_forecast_starts_after_latest_year() {
        let rows = vec![
            row("2023-12-31", "121"),
            row("2022-12-31", "110"),
            row("2021-12-31", "100"),
        ];
        let history =
            merge_statements(&rows, &rows, &rows, SourceOrder::MostRecentFirst).unwrap();

        let forecast = growth_forecast(&history, fields::OPERATING_CASHFLOW, 2).unwrap();

        assert_eq!(forecast.years().collect::<Vec<_>>(), vec![2024, 2025]);
        assert_relative_eq!(forecast.get(2024).unwrap(), 133.1, epsilon = 1e-9);
        assert_relative_eq!(forecast.get(2025).unwrap(), 146.41, epsilon = 1e-9);
    }

    #[test]
    fn test_growth_forecast_needs_history() {
        assert!(matches!(
            growth_forecast(&MergedHistory::default(), fields::OPERATING_CASHFLOW, 2),
            Err(ValuationError::MissingData { .. })
        ));
    }
}
