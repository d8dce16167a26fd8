use thiserror::Error;

// Unified error type for adamat

#[derive(Error, Debug)]
pub enum AdaptError {
    #[error("shape mismatch: left is {left:?}, right is {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("unsupported layout: {0}")]
    UnsupportedLayout(&'static str),
}
