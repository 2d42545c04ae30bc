//! Forecast splicing.
//!
//! Appends externally forecast years after the last reported period. A
//! forecast period carries only operating cash flow, capital expenditures,
//! its end date and the reporting currency.

use crate::config::ForecastDateStep;
use crate::error::{Result, ValuationError};
use chrono::{Datelike, Days, Months, NaiveDate};
use intrinsic_data::{FiscalPeriod, ForecastSeries, fields};
use std::collections::BTreeSet;

impl ForecastDateStep {
    /// Move a period end date forward by whole years.
    pub fn advance(self, from: NaiveDate, years: u32) -> Option<NaiveDate> {
        match self {
            Self::CalendarYears => from.checked_add_months(Months::new(years.checked_mul(12)?)),
            Self::FixedDays => from.checked_add_days(Days::new(365 * u64::from(years))),
        }
    }
}

/// Append forecast periods to an ascending historical sequence.
///
/// Both series must cover the same years and every year must follow the last
/// historical fiscal year. Each period's end date is the last historical end
/// date moved forward by the difference in years. Empty series leave the
/// sequence unchanged.
pub fn splice_forecast(
    mut periods: Vec<FiscalPeriod>,
    operating_cash_flow: &ForecastSeries,
    capital_expenditures: &ForecastSeries,
    step: ForecastDateStep,
) -> Result<Vec<FiscalPeriod>> {
    if !operating_cash_flow.same_years(capital_expenditures) {
        return Err(ValuationError::Alignment(format!(
            "forecast years differ: operating cash flow {:?}, capital expenditures {:?}",
            operating_cash_flow.years().collect::<Vec<_>>(),
            capital_expenditures.years().collect::<Vec<_>>(),
        )));
    }
    if operating_cash_flow.is_empty() {
        return Ok(periods);
    }

    let last = periods
        .iter()
        .max_by_key(|p| p.fiscal_date)
        .ok_or_else(|| ValuationError::missing(fields::FISCAL_DATE_ENDING, None))?;
    let last_date = last.fiscal_date;
    let last_year = last_date.year();
    let currency = last.reported_currency.clone();

    let mut taken: BTreeSet<i32> = periods.iter().map(|p| p.fiscal_year).collect();

    for (year, ocf) in operating_cash_flow.iter() {
        let capex = capital_expenditures
            .get(year)
            .ok_or_else(|| ValuationError::missing(fields::CAPITAL_EXPENDITURES, Some(year)))?;

        let offset = year
            .checked_sub(last_year)
            .and_then(|d| u32::try_from(d).ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ValuationError::Alignment(format!(
                    "forecast year {year} does not follow last reported year {last_year}"
                ))
            })?;

        let fiscal_date = step.advance(last_date, offset).ok_or_else(|| {
            ValuationError::Configuration(format!("forecast date for {year} is out of range"))
        })?;

        let period = FiscalPeriod::forecast(fiscal_date, currency.as_str(), ocf, capex);
        if !taken.insert(period.fiscal_year) {
            return Err(ValuationError::Alignment(format!(
                "forecast year {year} lands on {fiscal_date}, a fiscal year already present"
            )));
        }
        periods.push(period);
    }

    Ok(periods)
}
