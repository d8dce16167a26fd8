//! Matrix module: dense and sparse buffer types and kernels.

pub mod dense;
pub use dense::DenseMatrix;
pub mod sparse;
pub use sparse::CsrMatrix;
