//! adamat: density-adaptive dense/sparse matrix container over Faer
//!
//! This crate provides a 2-D numeric container that transparently stores its
//! contents in either dense or compressed-row sparse layout, switching
//! representation automatically based on observed or estimated nonzero
//! density. Arithmetic dispatches to the kernel matching the operands'
//! current layouts, and approximate nonzero-count bounds are maintained so
//! that most operations avoid full scans.

pub mod adaptive;
pub mod config;
pub mod core;
pub mod error;
pub mod matrix;

// Re-exports for convenience
pub use adaptive::*;
pub use config::*;
pub use core::*;
pub use error::*;
pub use matrix::*;
