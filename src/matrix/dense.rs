//! Dense-matrix API on top of Faer.
//!
//! This module provides the `DenseMatrix` trait and its implementation for
//! the `faer::Mat<T>` type: construction from raw row-major storage, scalar
//! kernels, the nonzero scan, and conversion to compressed-row storage.

use crate::core::traits::{MatShape, MatVec, NonzeroCount};
use crate::matrix::sparse::CsrMatrix;
use faer::Mat;
use num_traits::Float;

/// Dense buffer operations consumed by the adaptive container.
pub trait DenseMatrix<T>: MatShape + NonzeroCount {
    /// Construct from raw row-major storage.
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Self;
    /// Add `s` to every element.
    fn shift(&self, s: T) -> Self;
    /// Multiply every element by `s`.
    fn scale(&self, s: T) -> Self;
    /// Scan the grid and emit compressed-row storage of the nonzero entries.
    fn to_csr(&self) -> CsrMatrix<T>;
}

impl<T: Copy + Float + Send + Sync> DenseMatrix<T> for Mat<T> {
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        Mat::from_fn(nrows, ncols, |i, j| data[i * ncols + j])
    }

    fn shift(&self, s: T) -> Self {
        Mat::from_fn(self.nrows(), self.ncols(), |i, j| self[(i, j)] + s)
    }

    fn scale(&self, s: T) -> Self {
        Mat::from_fn(self.nrows(), self.ncols(), |i, j| self[(i, j)] * s)
    }

    fn to_csr(&self) -> CsrMatrix<T> {
        let (nrows, ncols) = (self.nrows(), self.ncols());
        let mut row_ptr = vec![0; nrows + 1];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        for i in 0..nrows {
            for j in 0..ncols {
                let v = self[(i, j)];
                if v != T::zero() {
                    col_idx.push(j);
                    values.push(v);
                }
            }
            row_ptr[i + 1] = col_idx.len();
        }
        CsrMatrix::from_csr(nrows, ncols, row_ptr, col_idx, values)
    }
}

impl<T: Copy + Float> MatShape for Mat<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }
    fn ncols(&self) -> usize {
        self.ncols()
    }
}

/// Full scan over the grid; the only O(size) bookkeeping kernel.
///
/// Uses a parallel column reduction when the `rayon` feature is enabled.
impl<T: Copy + Float + Send + Sync> NonzeroCount for Mat<T> {
    fn nnz(&self) -> usize {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            (0..self.ncols())
                .into_par_iter()
                .map(|j| {
                    (0..self.nrows())
                        .filter(|&i| self[(i, j)] != T::zero())
                        .count()
                })
                .sum()
        }
        #[cfg(not(feature = "rayon"))]
        {
            let mut count = 0;
            for j in 0..self.ncols() {
                for i in 0..self.nrows() {
                    if self[(i, j)] != T::zero() {
                        count += 1;
                    }
                }
            }
            count
        }
    }
}

/// Implements matrix-vector multiplication for `faer::Mat`.
///
/// Computes `y = A * x` where `A` is a dense matrix, `x` and `y` are vectors.
impl<T: Float> MatVec<Vec<T>> for Mat<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.nrows(), y.len(), "Output vector y has incorrect length");
        assert_eq!(self.ncols(), x.len(), "Input vector x has incorrect length");
        for i in 0..self.nrows() {
            y[i] = T::zero();
            for j in 0..self.ncols() {
                y[i] = y[i] + self[(i, j)] * x[j];
            }
        }
    }
}
