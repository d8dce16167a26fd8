//! Policy configuration.

pub mod options;
pub use options::{AdaptOptions, THRESHOLD_DENSITY};
