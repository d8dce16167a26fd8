//! Optional lower/upper bounds on a matrix's nonzero count.
//!
//! Bounds are cheaper to maintain than exact counts: most operations update
//! them analytically, and a full scan is only paid when a bound is too loose
//! to decide a layout conversion.

/// Guaranteed bounds on the true nonzero count, either side possibly unknown.
///
/// When both sides are present, `lower <= upper <= rows * cols`; when both
/// are present and equal they are the exact count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NzBounds {
    /// Guaranteed lower bound, or unknown.
    pub lower: Option<usize>,
    /// Guaranteed upper bound, or unknown.
    pub upper: Option<usize>,
}

impl NzBounds {
    /// Both sides unknown.
    pub fn unknown() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Both sides pinned to the exact count `n`.
    pub fn exact(n: usize) -> Self {
        Self {
            lower: Some(n),
            upper: Some(n),
        }
    }

    /// The exact count, when the bounds have converged.
    pub fn as_exact(&self) -> Option<usize> {
        match (self.lower, self.upper) {
            (Some(l), Some(u)) if l == u => Some(l),
            _ => None,
        }
    }

    /// Whether the bounds have converged to an exact count.
    pub fn is_exact(&self) -> bool {
        self.as_exact().is_some()
    }

    /// Analytic bounds for an elementwise sum or difference of two matrices
    /// of `size` total elements.
    ///
    /// The nonzero count of a sum is at most the sum of the operands' counts
    /// (overlap included), capped at the element count. The lower bound is
    /// the subtractive direction of the same estimate: entries can cancel at
    /// any position where the supports overlap, leaving at least
    /// `|lower_a - lower_b|` nonzeros. Each side is present only when both
    /// operands supply it. Deliberately loose; no scan.
    pub fn add_estimate(&self, other: &NzBounds, size: usize) -> NzBounds {
        NzBounds {
            lower: self.lower.zip(other.lower).map(|(a, b)| a.abs_diff(b)),
            upper: self.upper.zip(other.upper).map(|(a, b)| (a + b).min(size)),
        }
    }
}

impl Default for NzBounds {
    fn default() -> Self {
        Self::unknown()
    }
}
