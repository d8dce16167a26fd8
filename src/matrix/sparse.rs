// CSR buffer type and the sparse kernels used by the adaptive container.

use crate::core::traits::{MatShape, MatVec, NonzeroCount};
use faer::Mat;
use num_traits::Float;

/// Compressed-row numeric storage.
///
/// Standard CSR encoding: `row_ptr` has `nrows + 1` entries, row `i`'s
/// stored entries live at `row_ptr[i]..row_ptr[i + 1]` in `col_idx` and
/// `values`, and column indices are strictly increasing within a row.
/// The structural count includes explicit zeros.
#[derive(Clone, Debug)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy + Float> CsrMatrix<T> {
    /// Build a CSR matrix from raw row-ptr, col-idx, and values.
    ///
    /// Structural validity is a caller contract; malformed input panics, as
    /// with a checked backend constructor.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(row_ptr.len(), nrows + 1, "row_ptr must have nrows + 1 entries");
        assert_eq!(row_ptr[0], 0, "row_ptr must start at 0");
        assert_eq!(*row_ptr.last().unwrap(), col_idx.len(), "row_ptr must end at the entry count");
        assert_eq!(col_idx.len(), values.len(), "col_idx and values must have equal length");
        for i in 0..nrows {
            assert!(row_ptr[i] <= row_ptr[i + 1], "row_ptr must be nondecreasing");
            for k in row_ptr[i]..row_ptr[i + 1] {
                assert!(col_idx[k] < ncols, "column index out of range");
                if k > row_ptr[i] {
                    assert!(
                        col_idx[k - 1] < col_idx[k],
                        "column indices must be strictly increasing within a row"
                    );
                }
            }
        }
        Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Row pointers; `nrows + 1` entries.
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column indices of the stored entries.
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Stored entry values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Expand the compressed structure to a full row-major grid.
    pub fn to_dense(&self) -> Mat<T> {
        let mut out = Mat::from_fn(self.nrows, self.ncols, |_, _| T::zero());
        for i in 0..self.nrows {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                out[(i, self.col_idx[k])] = self.values[k];
            }
        }
        out
    }

    /// Elementwise sum: C = A + B.
    pub fn add(&self, other: &Self) -> Self {
        self.merge(other, |a, b| a + b, |a| a, |b| b)
    }

    /// Elementwise difference: C = A - B. Entries present only on the right
    /// are negated.
    pub fn sub(&self, other: &Self) -> Self {
        self.merge(other, |a, b| a - b, |a| a, |b| -b)
    }

    /// Row-by-row two-pointer merge over sorted column indices, union
    /// semantics. Entries that cancel numerically are kept as explicit
    /// zeros; the structural count never understates the merge.
    fn merge(
        &self,
        other: &Self,
        both: impl Fn(T, T) -> T,
        left_only: impl Fn(T) -> T,
        right_only: impl Fn(T) -> T,
    ) -> Self {
        assert_eq!(self.nrows, other.nrows, "row counts must match");
        assert_eq!(self.ncols, other.ncols, "column counts must match");
        let mut row_ptr = vec![0; self.nrows + 1];
        let mut col_idx = Vec::with_capacity(self.values.len() + other.values.len());
        let mut values = Vec::with_capacity(self.values.len() + other.values.len());
        for i in 0..self.nrows {
            let mut ka = self.row_ptr[i];
            let mut kb = other.row_ptr[i];
            let end_a = self.row_ptr[i + 1];
            let end_b = other.row_ptr[i + 1];
            while ka < end_a && kb < end_b {
                let ca = self.col_idx[ka];
                let cb = other.col_idx[kb];
                if ca == cb {
                    col_idx.push(ca);
                    values.push(both(self.values[ka], other.values[kb]));
                    ka += 1;
                    kb += 1;
                } else if ca < cb {
                    col_idx.push(ca);
                    values.push(left_only(self.values[ka]));
                    ka += 1;
                } else {
                    col_idx.push(cb);
                    values.push(right_only(other.values[kb]));
                    kb += 1;
                }
            }
            while ka < end_a {
                col_idx.push(self.col_idx[ka]);
                values.push(left_only(self.values[ka]));
                ka += 1;
            }
            while kb < end_b {
                col_idx.push(other.col_idx[kb]);
                values.push(right_only(other.values[kb]));
                kb += 1;
            }
            row_ptr[i + 1] = col_idx.len();
        }
        Self {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Multiply every stored value by `s`; the stored pattern is unchanged.
    pub fn scale(&self, s: T) -> Self {
        Self {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptr: self.row_ptr.clone(),
            col_idx: self.col_idx.clone(),
            values: self.values.iter().map(|&v| v * s).collect(),
        }
    }

    /// Add `s` to every element, implicit zeros included. The result is a
    /// full dense grid.
    pub fn shift(&self, s: T) -> Mat<T> {
        let mut out = Mat::from_fn(self.nrows, self.ncols, |_, _| s);
        for i in 0..self.nrows {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                out[(i, self.col_idx[k])] = self.values[k] + s;
            }
        }
        out
    }

    /// Sparse × sparse product via row-by-row accumulation into a dense
    /// workspace. Accumulated entries that cancel to zero are dropped.
    pub fn matmul(&self, other: &Self) -> Self {
        assert_eq!(self.ncols, other.nrows, "inner dimensions must match");
        let mut row_ptr = vec![0; self.nrows + 1];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        let mut acc = vec![T::zero(); other.ncols];
        let mut seen = vec![false; other.ncols];
        let mut touched: Vec<usize> = Vec::new();
        for i in 0..self.nrows {
            touched.clear();
            for ka in self.row_ptr[i]..self.row_ptr[i + 1] {
                let k = self.col_idx[ka];
                let va = self.values[ka];
                for kb in other.row_ptr[k]..other.row_ptr[k + 1] {
                    let j = other.col_idx[kb];
                    if !seen[j] {
                        seen[j] = true;
                        touched.push(j);
                    }
                    acc[j] = acc[j] + va * other.values[kb];
                }
            }
            touched.sort_unstable();
            for &j in &touched {
                if acc[j] != T::zero() {
                    col_idx.push(j);
                    values.push(acc[j]);
                }
                acc[j] = T::zero();
                seen[j] = false;
            }
            row_ptr[i + 1] = col_idx.len();
        }
        Self {
            nrows: self.nrows,
            ncols: other.ncols,
            row_ptr,
            col_idx,
            values,
        }
    }
}

impl<T> MatShape for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

impl<T> NonzeroCount for CsrMatrix<T> {
    fn nnz(&self) -> usize {
        *self.row_ptr.last().unwrap_or(&0)
    }
}

/// CSR matrix-vector product: y = A * x.
impl<T: Copy + Float> MatVec<Vec<T>> for CsrMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(x.len(), self.ncols, "Input vector x has incorrect length");
        assert_eq!(y.len(), self.nrows, "Output vector y has incorrect length");
        for i in 0..self.nrows {
            let mut sum = T::zero();
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum = sum + self.values[k] * x[self.col_idx[k]];
            }
            y[i] = sum;
        }
    }
}

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "rayon")]
impl<T: Copy + Float + Send + Sync> CsrMatrix<T> {
    /// Parallel SpMV using Rayon
    pub fn spmv_parallel(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols);
        assert_eq!(y.len(), self.nrows);
        y.par_iter_mut().enumerate().for_each(|(i, yi)| {
            let mut sum = T::zero();
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum = sum + self.values[k] * x[self.col_idx[k]];
            }
            *yi = sum;
        });
    }
}
