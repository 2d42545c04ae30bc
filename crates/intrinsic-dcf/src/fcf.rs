//! Free cash flow derivation.

use intrinsic_data::FiscalPeriod;

/// Operating cash flow minus capital expenditures; unknown if either is.
pub fn free_cash_flow(
    operating_cash_flow: Option<f64>,
    capital_expenditures: Option<f64>,
) -> Option<f64> {
    operating_cash_flow
        .zip(capital_expenditures)
        .map(|(ocf, capex)| ocf - capex)
}

/// Set `free_cash_flow` on every period.
///
/// A period missing either input gets no free cash flow rather than zero.
pub fn derive_free_cash_flow(periods: &mut [FiscalPeriod]) {
    for period in periods {
        period.free_cash_flow =
            free_cash_flow(period.operating_cash_flow(), period.capital_expenditures());
    }
}
