//! DCF Model
//!
//! Sequences the valuation stages over one fully assembled set of inputs:
//!
//! 1. free cash flow = operating cash flow - capital expenditures
//! 2. forecast periods discounted to present value
//! 3. Gordon Growth terminal value from the last forecast period
//! 4. enterprise value bridged to equity value per share
//!
//! No stage performs I/O. Intermediate figures are reported as `tracing`
//! debug events and kept on the [`ValuationResult`].

use crate::bridge::{BalanceSheetPosition, EquityBridge};
use crate::config::DcfConfig;
use crate::discount::discount_cash_flows;
use crate::error::{Result, ValuationError};
use crate::fcf::derive_free_cash_flow;
use crate::splice::splice_forecast;
use crate::terminal::{terminal_value, validate_rates};
use intrinsic_data::{FiscalPeriod, ForecastSeries, MergedHistory, fields, parse_rate};
use serde::{Deserialize, Serialize};

/// Externally estimated figures for one valuation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastInputs {
    /// Operating cash flow by forecast year
    pub operating_cash_flow: ForecastSeries,
    /// Capital expenditures by forecast year
    pub capital_expenditures: ForecastSeries,
    /// Discount rate (WACC) as a fraction
    pub discount_rate: f64,
    /// Perpetual growth rate as a fraction
    pub perpetual_growth_rate: f64,
}

impl ForecastInputs {
    /// Create a new set of forecast inputs.
    pub const fn new(
        operating_cash_flow: ForecastSeries,
        capital_expenditures: ForecastSeries,
        discount_rate: f64,
        perpetual_growth_rate: f64,
    ) -> Self {
        Self {
            operating_cash_flow,
            capital_expenditures,
            discount_rate,
            perpetual_growth_rate,
        }
    }

    /// Parse the four estimator answers.
    pub fn from_responses(
        operating_cash_flow: &str,
        capital_expenditures: &str,
        discount_rate: &str,
        perpetual_growth_rate: &str,
    ) -> Result<Self> {
        Ok(Self::new(
            ForecastSeries::from_response(operating_cash_flow)?,
            ForecastSeries::from_response(capital_expenditures)?,
            parse_rate(discount_rate)?,
            parse_rate(perpetual_growth_rate)?,
        ))
    }
}

/// Everything needed to run one valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    /// Historical and forecast periods
    pub periods: Vec<FiscalPeriod>,
    /// Discount rate (WACC) as a fraction
    pub discount_rate: f64,
    /// Perpetual growth rate as a fraction
    pub perpetual_growth_rate: f64,
    /// Shares outstanding
    pub shares_outstanding: u64,
    /// Latest reported debt and cash
    pub position: BalanceSheetPosition,
}

impl ValuationInputs {
    /// Splice a forecast onto merged history and read the latest balance
    /// sheet position.
    pub fn assemble(
        history: MergedHistory,
        forecast: &ForecastInputs,
        shares_outstanding: u64,
        config: &DcfConfig,
    ) -> Result<Self> {
        let latest = history
            .latest()
            .ok_or_else(|| ValuationError::missing(fields::FISCAL_DATE_ENDING, None))?;
        let position = BalanceSheetPosition::from_period(latest, config.net_debt_method)?;

        let periods = splice_forecast(
            history.into_periods(),
            &forecast.operating_cash_flow,
            &forecast.capital_expenditures,
            config.forecast_date_step,
        )?;

        Ok(Self {
            periods,
            discount_rate: forecast.discount_rate,
            perpetual_growth_rate: forecast.perpetual_growth_rate,
            shares_outstanding,
            position,
        })
    }

    /// Number of periods taken from reported statements.
    pub fn historical_periods(&self) -> usize {
        self.periods.iter().filter(|p| p.is_historical).count()
    }
}

/// Outcome of one valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Intrinsic value per share
    pub per_share_value: f64,
    /// Sum of discounted forecast free cash flow
    pub total_pv_of_fcf: f64,
    /// Undiscounted terminal value
    pub terminal_value: f64,
    /// Discounted terminal value
    pub pv_of_terminal_value: f64,
    /// Total enterprise value
    pub enterprise_value: f64,
    /// Debt minus cash
    pub net_debt: f64,
    /// Enterprise value less net debt
    pub adjusted_enterprise_value: f64,
    /// Value attributable to shareholders
    pub equity_value: f64,
    /// Free cash flow of the last forecast period
    pub last_free_cash_flow: f64,
    /// Discount rate used
    pub discount_rate: f64,
    /// Perpetual growth rate used
    pub perpetual_growth_rate: f64,
    /// Discounted forecast periods
    pub schedule: Vec<FiscalPeriod>,
}

/// Discounted cash flow model.
#[derive(Debug, Clone, Default)]
pub struct DcfModel {
    config: DcfConfig,
}

impl DcfModel {
    /// Create a new model with the given configuration.
    pub const fn new(config: DcfConfig) -> Self {
        Self { config }
    }

    /// Model configuration.
    pub const fn config(&self) -> &DcfConfig {
        &self.config
    }

    /// Run one valuation.
    ///
    /// Fails before any arithmetic if the rates are unusable, and fails
    /// without a partial result if any later stage does.
    pub fn run(&self, inputs: ValuationInputs) -> Result<ValuationResult> {
        let ValuationInputs {
            mut periods,
            discount_rate,
            perpetual_growth_rate,
            shares_outstanding,
            position,
        } = inputs;

        validate_rates(discount_rate, perpetual_growth_rate)?;

        derive_free_cash_flow(&mut periods);
        let schedule =
            discount_cash_flows(periods, discount_rate, self.config.discount_convention)?;

        let last = schedule
            .last()
            .ok_or_else(|| ValuationError::missing("freeCashFlow", None))?;
        let last_free_cash_flow = last
            .free_cash_flow
            .ok_or_else(|| ValuationError::missing("freeCashFlow", Some(last.fiscal_year)))?;

        let terminal = terminal_value(last_free_cash_flow, perpetual_growth_rate, discount_rate)?;
        let bridge = EquityBridge::compute(
            &schedule,
            terminal,
            discount_rate,
            &position,
            shares_outstanding,
        )?;

        tracing::debug!(
            last_free_cash_flow,
            terminal_value = bridge.terminal_value,
            pv_of_terminal_value = bridge.pv_of_terminal_value,
            total_pv_of_fcf = bridge.total_pv_of_fcf,
            total_debt = position.total_debt,
            cash_and_equivalents = position.cash_and_equivalents,
            adjusted_enterprise_value = bridge.adjusted_enterprise_value,
            "DCF bridge"
        );
        tracing::debug!(
            "Equity value {:.2} over {} shares: {:.2} per share",
            bridge.equity_value,
            shares_outstanding,
            bridge.per_share_value
        );

        Ok(ValuationResult {
            per_share_value: bridge.per_share_value,
            total_pv_of_fcf: bridge.total_pv_of_fcf,
            terminal_value: bridge.terminal_value,
            pv_of_terminal_value: bridge.pv_of_terminal_value,
            enterprise_value: bridge.enterprise_value,
            net_debt: bridge.net_debt,
            adjusted_enterprise_value: bridge.adjusted_enterprise_value,
            equity_value: bridge.equity_value,
            last_free_cash_flow,
            discount_rate,
            perpetual_growth_rate,
            schedule,
        })
    }
}

/// Run one valuation with the default configuration.
pub fn run_valuation(inputs: ValuationInputs) -> Result<ValuationResult> {
    DcfModel::default().run(inputs)
}
