//! Density-adaptive 2-D numeric container.
//!
//! `AdaptiveArray` wraps either a dense `faer::Mat<T>` or a `CsrMatrix<T>`
//! and tracks nonzero-count bounds. Every binary operation first adapts each
//! operand (recomputing bounds only when they cannot decide a conversion,
//! then converting layout when the density crossover is passed), dispatches
//! to the kernel matching the concrete layout pair, and estimates the
//! result's bounds analytically instead of counting.

use crate::adaptive::bounds::NzBounds;
use crate::config::AdaptOptions;
use crate::core::traits::{MatShape, MatVec, NonzeroCount};
use crate::error::AdaptError;
use crate::matrix::dense::DenseMatrix;
use crate::matrix::sparse::CsrMatrix;
use faer::Mat;
use faer::traits::ComplexField;
use num_traits::Float;

/// Tagged storage layout: a full row-major grid or compressed-row structure.
#[derive(Clone, Debug)]
pub enum Layout<T> {
    /// Full rectangular grid, zeros stored.
    Dense(Mat<T>),
    /// Compressed-row structure, only stored entries.
    Sparse(CsrMatrix<T>),
}

/// A 2-D numeric array that picks its own storage layout.
///
/// Arithmetic never mutates an operand's numeric value; the adaptation step
/// may rewrite its layout and bounds in place as a cache refresh, which is
/// why binary operations take `&mut` operands.
#[derive(Clone, Debug)]
pub struct AdaptiveArray<T> {
    data: Layout<T>,
    bounds: NzBounds,
    opts: AdaptOptions,
}

impl<T: Copy + Float + ComplexField + Send + Sync> AdaptiveArray<T> {
    /// Wrap a dense buffer; bounds start unknown.
    pub fn from_dense(data: Mat<T>) -> Self {
        Self {
            data: Layout::Dense(data),
            bounds: NzBounds::unknown(),
            opts: AdaptOptions::default(),
        }
    }

    /// Wrap a sparse buffer; bounds start unknown.
    pub fn from_sparse(data: CsrMatrix<T>) -> Self {
        Self {
            data: Layout::Sparse(data),
            bounds: NzBounds::unknown(),
            opts: AdaptOptions::default(),
        }
    }

    /// Convert nested rows into a dense buffer; bounds start unknown.
    ///
    /// Fails with `Conversion` when the rows do not form a rectangular grid.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, AdaptError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(AdaptError::Conversion(format!(
                "ragged input: expected {} columns per row, found a row with {}",
                ncols,
                bad.len()
            )));
        }
        Ok(Self::from_dense(Mat::from_fn(nrows, ncols, |i, j| rows[i][j])))
    }

    /// Replace the adaptation options (the density crossover).
    pub fn with_options(mut self, opts: AdaptOptions) -> Self {
        self.opts = opts;
        self
    }

    /// `(rows, cols)`. Immutable for the lifetime of the instance.
    pub fn shape(&self) -> (usize, usize) {
        match &self.data {
            Layout::Dense(m) => (m.nrows(), m.ncols()),
            Layout::Sparse(c) => (c.nrows(), c.ncols()),
        }
    }

    /// Total element count, `rows * cols`.
    pub fn size(&self) -> usize {
        let (r, c) = self.shape();
        r * c
    }

    /// Name of the numeric element type of the underlying buffer.
    pub fn element_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    /// Current nonzero-count bounds.
    pub fn bounds(&self) -> NzBounds {
        self.bounds
    }

    /// Current storage layout.
    pub fn layout(&self) -> &Layout<T> {
        &self.data
    }

    pub fn is_dense(&self) -> bool {
        matches!(self.data, Layout::Dense(_))
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self.data, Layout::Sparse(_))
    }

    /// Expand to a dense grid without touching the stored layout.
    pub fn to_dense(&self) -> Mat<T> {
        match &self.data {
            Layout::Dense(m) => m.clone(),
            Layout::Sparse(c) => c.to_dense(),
        }
    }

    /// Pin both bounds to the exact nonzero count.
    ///
    /// A no-op when the bounds have already converged. Otherwise scans the
    /// dense grid or reads the sparse structural count; the only bookkeeping
    /// step with cost proportional to `size()`, and it is invoked lazily.
    pub fn count_nonzeros(&mut self) {
        if self.bounds.is_exact() {
            return;
        }
        let n = match &self.data {
            Layout::Dense(m) => m.nnz(),
            Layout::Sparse(c) => c.nnz(),
        };
        self.bounds = NzBounds::exact(n);
    }

    /// Reconcile bounds and possibly convert layout.
    ///
    /// With `threshold = threshold_density * size()`:
    /// dense storage sparsifies iff the nonzero count is strictly below the
    /// threshold, sparse storage densifies iff it is strictly above; a count
    /// exactly at the threshold converts in neither direction. The exact
    /// count is recomputed only when the cached bound cannot already decide
    /// the strict comparison.
    pub fn adapt(&mut self) {
        let threshold = self.opts.threshold_density * self.size() as f64;
        match self.data {
            Layout::Dense(_) => {
                if self.bounds.upper.is_none_or(|ub| ub as f64 >= threshold) {
                    self.count_nonzeros();
                }
                if let Some(ub) = self.bounds.upper {
                    if (ub as f64) < threshold {
                        self.sparsify();
                    }
                }
            }
            Layout::Sparse(_) => {
                if self.bounds.lower.is_none_or(|lb| lb as f64 <= threshold) {
                    self.count_nonzeros();
                }
                if let Some(lb) = self.bounds.lower {
                    if (lb as f64) > threshold {
                        self.densify();
                    }
                }
            }
        }
    }

    /// Sparse → dense conversion; no-op when already dense. The represented
    /// value and bounds are unchanged.
    pub fn densify(&mut self) {
        if let Layout::Sparse(c) = &self.data {
            let dense = c.to_dense();
            self.data = Layout::Dense(dense);
        }
    }

    /// Dense → sparse conversion; no-op when already sparse. The represented
    /// value and bounds are unchanged.
    pub fn sparsify(&mut self) {
        if let Layout::Dense(m) = &self.data {
            let csr = m.to_csr();
            self.data = Layout::Sparse(csr);
        }
    }

    /// Add `s` to every element.
    ///
    /// Adapts self, then uses the representation-appropriate kernel; the
    /// sparse kernel densifies, since a scalar reaches every implicit zero.
    /// Result bounds are unknown: a scalar can rewrite the sparsity pattern
    /// arbitrarily.
    pub fn add_scalar(&mut self, s: T) -> Self {
        self.adapt();
        let data = match &self.data {
            Layout::Dense(m) => Layout::Dense(m.shift(s)),
            Layout::Sparse(c) => Layout::Dense(c.shift(s)),
        };
        Self {
            data,
            bounds: NzBounds::unknown(),
            opts: self.opts,
        }
    }

    /// Multiply every element by `s`.
    ///
    /// Scaling leaves the stored pattern intact, so bounds carry over for
    /// nonzero `s`. Scaling a dense grid by zero pins the bounds to exact
    /// zero; a sparse operand keeps its structural bounds either way.
    pub fn mul_scalar(&mut self, s: T) -> Self {
        self.adapt();
        let (data, bounds) = match &self.data {
            Layout::Dense(m) => {
                let bounds = if s == T::zero() {
                    NzBounds::exact(0)
                } else {
                    self.bounds
                };
                (Layout::Dense(m.scale(s)), bounds)
            }
            Layout::Sparse(c) => (Layout::Sparse(c.scale(s)), self.bounds),
        };
        Self {
            data,
            bounds,
            opts: self.opts,
        }
    }

    /// Elementwise sum, producing a new array.
    ///
    /// Shapes must match. Both operands are adapted first, then the kernel
    /// matching the layout pair runs; mixed pairs promote the sparse side to
    /// dense. Result bounds come from [`NzBounds::add_estimate`], never a
    /// scan.
    pub fn add_array(&mut self, other: &mut Self) -> Result<Self, AdaptError> {
        if self.shape() != other.shape() {
            return Err(AdaptError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        self.adapt();
        other.adapt();
        let data = match (&self.data, &other.data) {
            (Layout::Dense(a), Layout::Dense(b)) => Layout::Dense(a + b),
            (Layout::Sparse(a), Layout::Sparse(b)) => Layout::Sparse(a.add(b)),
            (Layout::Dense(a), Layout::Sparse(b)) => Layout::Dense(a + &b.to_dense()),
            (Layout::Sparse(a), Layout::Dense(b)) => Layout::Dense(&a.to_dense() + b),
        };
        Ok(Self {
            data,
            bounds: self.bounds.add_estimate(&other.bounds, self.size()),
            opts: self.opts,
        })
    }

    /// Elementwise difference, producing a new array.
    ///
    /// Same shape rule, dispatch, and bound estimates as [`Self::add_array`];
    /// the cancellation argument behind the estimate is symmetric in sign.
    pub fn sub_array(&mut self, other: &mut Self) -> Result<Self, AdaptError> {
        if self.shape() != other.shape() {
            return Err(AdaptError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        self.adapt();
        other.adapt();
        let data = match (&self.data, &other.data) {
            (Layout::Dense(a), Layout::Dense(b)) => Layout::Dense(a - b),
            (Layout::Sparse(a), Layout::Sparse(b)) => Layout::Sparse(a.sub(b)),
            (Layout::Dense(a), Layout::Sparse(b)) => Layout::Dense(a - &b.to_dense()),
            (Layout::Sparse(a), Layout::Dense(b)) => Layout::Dense(&a.to_dense() - b),
        };
        Ok(Self {
            data,
            bounds: self.bounds.add_estimate(&other.bounds, self.size()),
            opts: self.opts,
        })
    }

    /// Matrix product, producing a new array of shape `(self.rows, other.cols)`.
    ///
    /// Inner dimensions must agree. Adapt-then-dispatch like addition; mixed
    /// pairs promote to dense. No analytic bound rule exists for a product,
    /// so result bounds are unknown.
    pub fn matmul(&mut self, other: &mut Self) -> Result<Self, AdaptError> {
        if self.shape().1 != other.shape().0 {
            return Err(AdaptError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        self.adapt();
        other.adapt();
        let data = match (&self.data, &other.data) {
            (Layout::Dense(a), Layout::Dense(b)) => Layout::Dense(a * b),
            (Layout::Sparse(a), Layout::Sparse(b)) => Layout::Sparse(a.matmul(b)),
            (Layout::Dense(a), Layout::Sparse(b)) => Layout::Dense(a * &b.to_dense()),
            (Layout::Sparse(a), Layout::Dense(b)) => Layout::Dense(&a.to_dense() * b),
        };
        Ok(Self {
            data,
            bounds: NzBounds::unknown(),
            opts: self.opts,
        })
    }
}

/// Matrix-vector product dispatched on the current layout, without adapting.
impl<T: Copy + Float + ComplexField + Send + Sync> MatVec<Vec<T>> for AdaptiveArray<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        match &self.data {
            Layout::Dense(m) => m.matvec(x, y),
            Layout::Sparse(c) => c.matvec(x, y),
        }
    }
}

impl<T> MatShape for AdaptiveArray<T> {
    fn nrows(&self) -> usize {
        match &self.data {
            Layout::Dense(m) => m.nrows(),
            Layout::Sparse(c) => c.nrows(),
        }
    }
    fn ncols(&self) -> usize {
        match &self.data {
            Layout::Dense(m) => m.ncols(),
            Layout::Sparse(c) => c.ncols(),
        }
    }
}
