//! Core matrix traits for adamat.

/// Matrix dimensions.
pub trait MatShape {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
}

/// Count of stored nonzero entries.
///
/// Dense implementations scan the grid; sparse implementations report the
/// structural count, explicit zeros included.
pub trait NonzeroCount {
    /// Number of stored nonzeros.
    fn nnz(&self) -> usize;
}

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}
