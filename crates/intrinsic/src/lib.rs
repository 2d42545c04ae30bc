#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/intrinsic/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use intrinsic_data as data;
pub use intrinsic_dcf as dcf;
pub use intrinsic_output as output;

pub use pipeline::{merge_history, value_company};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
