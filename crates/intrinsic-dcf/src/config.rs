//! Valuation configuration.

use crate::error::{Result, ValuationError};
use intrinsic_data::SourceOrder;
use serde::{Deserialize, Serialize};

/// Which year a forecast period's discount exponent is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountConvention {
    /// The first forecast year is year zero and is not discounted
    #[default]
    FirstForecastYear,
    /// The last reported year is year zero, so the first forecast year is
    /// discounted by one full year
    EndOfHistory,
}

/// How forecast period end dates are stepped forward from the last
/// reported period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastDateStep {
    /// Calendar years; a February 29 end date falls back to February 28
    #[default]
    CalendarYears,
    /// 365 days per year, ignoring leap days
    FixedDays,
}

/// Which liabilities count as debt in the equity bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetDebtMethod {
    /// `totalLiabilities`
    #[default]
    TotalLiabilities,
    /// `totalCurrentLiabilities + totalNonCurrentLiabilities`
    CurrentPlusNonCurrent,
}

/// Configuration for a DCF valuation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcfConfig {
    /// Discount exponent anchor (default: first forecast year)
    pub discount_convention: DiscountConvention,
    /// Forecast date stepping (default: calendar years)
    pub forecast_date_step: ForecastDateStep,
    /// Debt measure for the equity bridge (default: total liabilities)
    pub net_debt_method: NetDebtMethod,
    /// Row order of the raw statement sources (default: most recent first)
    pub source_order: SourceOrder,
}

impl DcfConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValuationError::Configuration(format!("invalid DCF configuration: {e}")))
    }

    /// Set the discount convention.
    pub const fn with_discount_convention(mut self, convention: DiscountConvention) -> Self {
        self.discount_convention = convention;
        self
    }

    /// Set the forecast date step.
    pub const fn with_forecast_date_step(mut self, step: ForecastDateStep) -> Self {
        self.forecast_date_step = step;
        self
    }

    /// Set the net debt method.
    pub const fn with_net_debt_method(mut self, method: NetDebtMethod) -> Self {
        self.net_debt_method = method;
        self
    }

    /// Set the statement source order.
    pub const fn with_source_order(mut self, order: SourceOrder) -> Self {
        self.source_order = order;
        self
    }
}
