//! Valuation summary.
//!
//! Presents a finished valuation the way an analyst reads it: the forecast
//! schedule year by year, then the bridge from enterprise value to the
//! per-share figure.

use intrinsic_dcf::ValuationResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A valuation of one company, ready for display or export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationSummary {
    /// Ticker symbol.
    pub symbol: String,

    /// Reporting currency of the schedule.
    pub currency: String,

    /// Valuation outcome and its discount schedule.
    pub result: ValuationResult,
}

impl ValuationSummary {
    /// Create a new summary.
    ///
    /// The currency is taken from the first forecast period, or left empty
    /// when the schedule is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use intrinsic_dcf::ValuationResult;
    /// use intrinsic_output::ValuationSummary;
    ///
    /// let result = ValuationResult {
    ///     per_share_value: 8.30,
    ///     total_pv_of_fcf: 212.96,
    ///     terminal_value: 1723.48,
    ///     pv_of_terminal_value: 1566.80,
    ///     enterprise_value: 1779.77,
    ///     net_debt: 450.0,
    ///     adjusted_enterprise_value: 1329.77,
    ///     equity_value: 829.77,
    ///     last_free_cash_flow: 117.13,
    ///     discount_rate: 0.10,
    ///     perpetual_growth_rate: 0.03,
    ///     schedule: vec![],
    /// };
    ///
    /// let summary = ValuationSummary::new("ACME", result);
    /// assert_eq!(summary.symbol, "ACME");
    /// assert!(summary.to_string().contains("8.30"));
    /// ```
    pub fn new(symbol: impl Into<String>, result: ValuationResult) -> Self {
        let currency = result
            .schedule
            .first()
            .map(|p| p.reported_currency.clone())
            .unwrap_or_default();

        Self {
            symbol: symbol.into(),
            currency,
            result,
        }
    }

    /// Intrinsic value per share.
    pub const fn per_share_value(&self) -> f64 {
        self.result.per_share_value
    }

    /// Share of enterprise value that comes from the terminal value.
    pub fn terminal_value_share(&self) -> f64 {
        if self.result.enterprise_value.abs() < 1e-10 {
            return 0.0;
        }
        self.result.pv_of_terminal_value / self.result.enterprise_value
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let r = &self.result;
        let mut output = String::new();

        output.push_str(&format!("\nDCF Valuation: {}\n", self.symbol));
        output.push_str(&format!(
            "Discount rate: {:.2}%  Perpetual growth: {:.2}%\n",
            r.discount_rate * 100.0,
            r.perpetual_growth_rate * 100.0
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if !r.schedule.is_empty() {
            output.push_str("\nForecast Schedule:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<8} {:<12} {:>18} {:>8} {:>18}\n",
                "Year", "Period End", "Free Cash Flow", "t", "Present Value"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for period in &r.schedule {
                output.push_str(&format!(
                    "{:<8} {:<12} {:>18} {:>8} {:>18}\n",
                    period.fiscal_year,
                    period.fiscal_date,
                    amount(period.free_cash_flow),
                    period
                        .years_in_future
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                    amount(period.present_value_of_fcf)
                ));
            }
        }

        output.push_str("\nEnterprise to Equity Bridge:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  PV of Free Cash Flow:     {:>18.2}\n",
            r.total_pv_of_fcf
        ));
        output.push_str(&format!(
            "  Terminal Value:           {:>18.2}\n",
            r.terminal_value
        ));
        output.push_str(&format!(
            "  PV of Terminal Value:     {:>18.2} ({:.1}% of EV)\n",
            r.pv_of_terminal_value,
            self.terminal_value_share() * 100.0
        ));
        output.push_str(&format!(
            "  Enterprise Value:         {:>18.2}\n",
            r.enterprise_value
        ));
        output.push_str(&format!("  Net Debt:                 {:>18.2}\n", r.net_debt));
        output.push_str(&format!(
            "  Adjusted EV:              {:>18.2}\n",
            r.adjusted_enterprise_value
        ));
        output.push_str(&format!(
            "  Equity Value:             {:>18.2}\n",
            r.equity_value
        ));
        output.push_str(&format!(
            "  Value per Share:          {:>18.2} {}\n",
            r.per_share_value, self.currency
        ));

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let r = &self.result;
        let mut output = String::new();

        output.push_str(&format!("# DCF Valuation: {}\n\n", self.symbol));
        output.push_str(&format!(
            "**Discount rate:** {:.2}% | **Perpetual growth:** {:.2}%\n\n",
            r.discount_rate * 100.0,
            r.perpetual_growth_rate * 100.0
        ));

        if !r.schedule.is_empty() {
            output.push_str("## Forecast Schedule\n\n");
            output.push_str("| Year | Period End | Free Cash Flow | t | Present Value |\n");
            output.push_str("|------|------------|----------------|---|---------------|\n");

            for period in &r.schedule {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    period.fiscal_year,
                    period.fiscal_date,
                    amount(period.free_cash_flow),
                    period
                        .years_in_future
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                    amount(period.present_value_of_fcf)
                ));
            }
            output.push('\n');
        }

        output.push_str("## Enterprise to Equity Bridge\n\n");
        output.push_str(&format!(
            "- **PV of Free Cash Flow:** {:.2}\n",
            r.total_pv_of_fcf
        ));
        output.push_str(&format!("- **Terminal Value:** {:.2}\n", r.terminal_value));
        output.push_str(&format!(
            "- **PV of Terminal Value:** {:.2} ({:.1}% of EV)\n",
            r.pv_of_terminal_value,
            self.terminal_value_share() * 100.0
        ));
        output.push_str(&format!(
            "- **Enterprise Value:** {:.2}\n",
            r.enterprise_value
        ));
        output.push_str(&format!("- **Net Debt:** {:.2}\n", r.net_debt));
        output.push_str(&format!(
            "- **Adjusted EV:** {:.2}\n",
            r.adjusted_enterprise_value
        ));
        output.push_str(&format!("- **Equity Value:** {:.2}\n", r.equity_value));
        output.push_str(&format!(
            "- **Value per Share:** {:.2} {}\n",
            r.per_share_value, self.currency
        ));

        output
    }
}

impl fmt::Display for ValuationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DCF Valuation: {}", self.symbol)?;
        writeln!(f, "  Enterprise Value: {:.2}", self.result.enterprise_value)?;
        writeln!(f, "  Equity Value: {:.2}", self.result.equity_value)?;
        writeln!(
            f,
            "  Value per Share: {:.2} {}",
            self.result.per_share_value, self.currency
        )?;
        Ok(())
    }
}

fn amount(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}
