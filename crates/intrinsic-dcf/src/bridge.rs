//! Enterprise-to-equity bridge.
//!
//! Turns discounted forecast periods and a terminal value into equity value
//! per share:
//!
//! - EV = sum(PV of FCF) + TV / (1 + r)^t_last
//! - adjusted EV = EV - (debt - cash)
//! - equity = adjusted EV - debt
//! - per share = equity / shares, or 0 when there are no shares

use crate::config::NetDebtMethod;
use crate::discount::present_value;
use crate::error::{Result, ValuationError};
use intrinsic_data::{FiscalPeriod, fields};
use serde::{Deserialize, Serialize};

/// Debt and cash at the valuation date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetPosition {
    /// Debt measure subtracted in the bridge
    pub total_debt: f64,
    /// Cash and cash equivalents
    pub cash_and_equivalents: f64,
}

impl BalanceSheetPosition {
    /// Create a new position.
    pub const fn new(total_debt: f64, cash_and_equivalents: f64) -> Self {
        Self {
            total_debt,
            cash_and_equivalents,
        }
    }

    /// Read the position from a reported period.
    pub fn from_period(period: &FiscalPeriod, method: NetDebtMethod) -> Result<Self> {
        let year = Some(period.fiscal_year);
        let total_debt = match method {
            NetDebtMethod::TotalLiabilities => period
                .total_liabilities()
                .ok_or_else(|| ValuationError::missing(fields::TOTAL_LIABILITIES, year))?,
            NetDebtMethod::CurrentPlusNonCurrent => {
                let current = period
                    .item(fields::TOTAL_CURRENT_LIABILITIES)
                    .ok_or_else(|| {
                        ValuationError::missing(fields::TOTAL_CURRENT_LIABILITIES, year)
                    })?;
                let non_current = period
                    .item(fields::TOTAL_NON_CURRENT_LIABILITIES)
                    .ok_or_else(|| {
                        ValuationError::missing(fields::TOTAL_NON_CURRENT_LIABILITIES, year)
                    })?;
                current + non_current
            }
        };
        let cash_and_equivalents = period
            .cash_and_equivalents()
            .ok_or_else(|| ValuationError::missing(fields::CASH_AND_EQUIVALENTS, year))?;

        Ok(Self::new(total_debt, cash_and_equivalents))
    }

    /// Debt minus cash.
    pub const fn net_debt(&self) -> f64 {
        self.total_debt - self.cash_and_equivalents
    }
}

/// Subtract net debt from enterprise value.
pub const fn adjust_for_net_debt(enterprise_value: f64, position: &BalanceSheetPosition) -> f64 {
    enterprise_value - position.net_debt()
}

/// Equity value and its per-share amount.
///
/// Zero shares outstanding gives a per-share value of exactly 0.
pub const fn equity_and_per_share_value(
    adjusted_enterprise_value: f64,
    total_debt: f64,
    shares_outstanding: u64,
) -> (f64, f64) {
    let equity_value = adjusted_enterprise_value - total_debt;
    let per_share_value = if shares_outstanding > 0 {
        equity_value / shares_outstanding as f64
    } else {
        0.0
    };
    (equity_value, per_share_value)
}

/// Every step of the bridge, kept for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityBridge {
    /// Sum of discounted forecast free cash flow
    pub total_pv_of_fcf: f64,
    /// Undiscounted terminal value
    pub terminal_value: f64,
    /// Terminal value discounted from the last forecast period
    pub pv_of_terminal_value: f64,
    /// Total enterprise value
    pub enterprise_value: f64,
    /// Debt minus cash
    pub net_debt: f64,
    /// Enterprise value less net debt
    pub adjusted_enterprise_value: f64,
    /// Value attributable to shareholders
    pub equity_value: f64,
    /// Equity value per share
    pub per_share_value: f64,
}

impl EquityBridge {
    /// Run the bridge over discounted forecast periods.
    ///
    /// The terminal value is discounted by the years-in-future of the last
    /// period.
    pub fn compute(
        discounted: &[FiscalPeriod],
        terminal_value: f64,
        discount_rate: f64,
        position: &BalanceSheetPosition,
        shares_outstanding: u64,
    ) -> Result<Self> {
        let last = discounted
            .last()
            .ok_or_else(|| ValuationError::missing("presentValueOfFCF", None))?;
        let last_offset = last
            .years_in_future
            .ok_or_else(|| ValuationError::missing("yearsInFuture", Some(last.fiscal_year)))?;

        let total_pv_of_fcf = discounted
            .iter()
            .map(|p| {
                p.present_value_of_fcf.ok_or_else(|| {
                    ValuationError::missing("presentValueOfFCF", Some(p.fiscal_year))
                })
            })
            .sum::<Result<f64>>()?;

        let pv_of_terminal_value = present_value(terminal_value, discount_rate, last_offset);
        let enterprise_value = total_pv_of_fcf + pv_of_terminal_value;
        let adjusted_enterprise_value = adjust_for_net_debt(enterprise_value, position);
        let (equity_value, per_share_value) = equity_and_per_share_value(
            adjusted_enterprise_value,
            position.total_debt,
            shares_outstanding,
        );

        Ok(Self {
            total_pv_of_fcf,
            terminal_value,
            pv_of_terminal_value,
            enterprise_value,
            net_debt: position.net_debt(),
            adjusted_enterprise_value,
            equity_value,
            per_share_value,
        })
    }
}
