//! The adaptive container: layout sum type, nonzero bounds, and the
//! adaptation policy that converts between dense and sparse storage.

pub mod bounds;
pub use bounds::NzBounds;

pub mod array;
pub use array::{AdaptiveArray, Layout};
