#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intrinsic/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod discount;
pub mod error;
pub mod fcf;
pub mod growth;
pub mod model;
pub mod splice;
pub mod terminal;

// Re-export main types
pub use bridge::{
    BalanceSheetPosition, EquityBridge, adjust_for_net_debt, equity_and_per_share_value,
};
pub use config::{DcfConfig, DiscountConvention, ForecastDateStep, NetDebtMethod};
pub use discount::{discount_cash_flows, present_value, validate_discount_rate};
pub use error::{Result, ValuationError};
pub use fcf::{derive_free_cash_flow, free_cash_flow};
pub use growth::{average_growth_rate, growth_forecast, project_future_values};
pub use model::{DcfModel, ForecastInputs, ValuationInputs, ValuationResult, run_valuation};
pub use splice::splice_forecast;
pub use terminal::{terminal_value, validate_rates};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
