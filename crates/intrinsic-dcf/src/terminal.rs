//! Gordon Growth terminal value.

use crate::discount::validate_discount_rate;
use crate::error::{Result, ValuationError};

/// Check that the rate pair admits a finite, positive-denominator terminal value.
pub fn validate_rates(discount_rate: f64, perpetual_growth_rate: f64) -> Result<()> {
    validate_discount_rate(discount_rate)?;

    if !perpetual_growth_rate.is_finite() {
        return Err(ValuationError::Configuration(format!(
            "perpetual growth rate must be finite, got {perpetual_growth_rate}"
        )));
    }
    if discount_rate <= perpetual_growth_rate {
        return Err(ValuationError::Configuration(format!(
            "discount rate {discount_rate} must exceed perpetual growth rate {perpetual_growth_rate}"
        )));
    }

    Ok(())
}

/// Value at the end of the forecast horizon of all later cash flows:
///
/// TV = FCF_last * (1 + g) / (r - g)
///
/// # Examples
///
/// ```
/// use intrinsic_dcf::terminal_value;
///
/// let tv = terminal_value(100.0, 0.02, 0.07).unwrap();
/// assert!((tv - 2040.0).abs() < 1e-9);
///
/// assert!(terminal_value(100.0, 0.07, 0.07).is_err());
/// ```
pub fn terminal_value(
    last_free_cash_flow: f64,
    perpetual_growth_rate: f64,
    discount_rate: f64,
) -> Result<f64> {
    validate_rates(discount_rate, perpetual_growth_rate)?;

    Ok(last_free_cash_flow * (1.0 + perpetual_growth_rate)
        / (discount_rate - perpetual_growth_rate))
}
