//! Options for the layout-adaptation policy.
//!
//! This module provides the `AdaptOptions` struct, which carries the single
//! tunable of the adaptation policy: the nonzero-density crossover between
//! dense and sparse storage. The default matches the crossover observed for
//! typical elementwise and multiply workloads.

/// Default nonzero-fraction crossover between dense and sparse storage.
pub const THRESHOLD_DENSITY: f64 = 0.4;

/// Adaptation policy parameters.
#[derive(Debug, Clone, Copy)]
pub struct AdaptOptions {
    /// Nonzero fraction below which sparse storage is preferred and above
    /// which dense storage is preferred. Comparisons against the derived
    /// count threshold are strict; a fraction exactly at the crossover
    /// converts in neither direction.
    pub threshold_density: f64,
}

impl Default for AdaptOptions {
    fn default() -> Self {
        Self {
            threshold_density: THRESHOLD_DENSITY,
        }
    }
}
