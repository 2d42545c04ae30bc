//! Time-indexed discounting of forecast free cash flow.
//!
//! Every period gets a whole-year offset from a base year, and forecast
//! periods have their free cash flow discounted by that offset:
//!
//! PV = FCF / (1 + r)^t
//!
//! Historical periods are tagged at creation, so the split between reported
//! and forecast years never depends on counting rows.

use crate::config::DiscountConvention;
use crate::error::{Result, ValuationError};
use chrono::Datelike;
use intrinsic_data::FiscalPeriod;

/// Discount `amount` back `years` whole years at `discount_rate`.
pub fn present_value(amount: f64, discount_rate: f64, years: i32) -> f64 {
    amount / (1.0 + discount_rate).powi(years)
}

/// Reject discount rates that make `(1 + r)^t` degenerate.
pub fn validate_discount_rate(discount_rate: f64) -> Result<()> {
    if discount_rate.is_finite() && discount_rate > -1.0 {
        Ok(())
    } else {
        Err(ValuationError::Configuration(format!(
            "discount rate must be finite and greater than -1, got {discount_rate}"
        )))
    }
}

/// Assign years-in-future and present values, keeping only forecast periods.
///
/// Periods are sorted by end date first. Historical periods must all precede
/// the forecast periods and at least one forecast period must exist. Each
/// period's offset is its calendar year minus the base year chosen by
/// `convention`; historical offsets are zero or negative. A forecast period
/// without free cash flow is an error.
pub fn discount_cash_flows(
    mut periods: Vec<FiscalPeriod>,
    discount_rate: f64,
    convention: DiscountConvention,
) -> Result<Vec<FiscalPeriod>> {
    validate_discount_rate(discount_rate)?;

    periods.sort_by_key(|p| p.fiscal_date);

    let historical_periods = periods.iter().filter(|p| p.is_historical).count();
    let first_forecast = periods
        .iter()
        .position(|p| !p.is_historical)
        .ok_or(ValuationError::Index {
            historical_periods,
            total_periods: periods.len(),
        })?;

    if let Some(late) = periods[first_forecast..].iter().find(|p| p.is_historical) {
        return Err(ValuationError::Alignment(format!(
            "reported period {} falls after forecast period {}",
            late.fiscal_year, periods[first_forecast].fiscal_year,
        )));
    }

    let first_forecast_year = periods[first_forecast].fiscal_date.year();
    let base_year = match convention {
        DiscountConvention::FirstForecastYear => first_forecast_year,
        DiscountConvention::EndOfHistory => first_forecast
            .checked_sub(1)
            .map_or(first_forecast_year - 1, |i| periods[i].fiscal_date.year()),
    };

    for period in &mut periods {
        let years_in_future = period.fiscal_date.year() - base_year;
        period.years_in_future = Some(years_in_future);
        period.present_value_of_fcf = period
            .free_cash_flow
            .map(|fcf| present_value(fcf, discount_rate, years_in_future));
    }

    let forecast = periods.split_off(first_forecast);
    if let Some(period) = forecast.iter().find(|p| p.present_value_of_fcf.is_none()) {
        return Err(ValuationError::missing("freeCashFlow", Some(period.fiscal_year)));
    }

    Ok(forecast)
}
