#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::NumericError;

/// Linear algebra utilities for 3x3 matrices and 3d points.
pub mod linalg;

/// Pluggable 3x3 singular value decomposition.
pub mod svd;

pub use glam::{DMat3, DVec3};
