//! Singular value decomposition of 3×3 matrices behind a pluggable backend.
//!
//! For any matrix A ∈ ℝ³ˣ³ the SVD decomposes it as
//!
//! ```text
//! A = U Σ Vᵀ
//! ```
//!
//! where U and V are orthogonal and Σ is diagonal with non-negative entries.
//!
//! Backends differ in how they order the singular triplets and in the sign they
//! pick for each pair of singular vectors. Code consuming a [`Svd3Set`] must not
//! rely on either: it may only assume the reconstruction and the orthogonality
//! of the factors, which [`Svd3Set::validate`] checks.
//!
//! # Example
//!
//! ```
//! use fidreg_linalg::svd::{FaerSvd3, Svd3};
//! use glam::{DMat3, DVec3};
//!
//! let a = DMat3::from_diagonal(DVec3::new(1.0, 2.0, 3.0));
//! let svd = FaerSvd3.svd3(&a).unwrap();
//! assert!(svd.reconstruct().abs_diff_eq(a, 1e-12));
//! ```

use glam::{DMat3, DVec3};

use crate::linalg::{dmat3_to_faer, faer_to_dmat3};
use crate::NumericError;

/// Factors of a 3x3 singular value decomposition `A = U * diag(s) * V^T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svd3Set {
    /// The matrix of left singular vectors.
    u: DMat3,

    /// The singular values.
    s: DVec3,

    /// The matrix of right singular vectors.
    v: DMat3,
}

impl Svd3Set {
    /// Assemble a decomposition from its factors.
    ///
    /// Column `k` of `u` and `v` pairs with `s[k]`.
    pub fn new(u: DMat3, s: DVec3, v: DMat3) -> Self {
        Self { u, s, v }
    }

    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &DMat3 {
        &self.u
    }

    /// Get the singular values.
    #[inline]
    pub fn s(&self) -> &DVec3 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &DMat3 {
        &self.v
    }

    /// Rebuild `U * diag(s) * V^T`.
    pub fn reconstruct(&self) -> DMat3 {
        self.u * DMat3::from_diagonal(self.s) * self.v.transpose()
    }

    /// Check the properties every backend must deliver.
    ///
    /// The factors must be finite, `U` and `V` orthonormal within `tol` and the
    /// singular values non-negative (down to `-tol`).
    pub fn validate(&self, tol: f64) -> Result<(), NumericError> {
        if !(self.u.is_finite() && self.s.is_finite() && self.v.is_finite()) {
            return Err(NumericError::NonFiniteOutput);
        }
        for (factor, m) in [("U", &self.u), ("V", &self.v)] {
            let error = crate::linalg::orthonormality_error(m);
            if error > tol {
                return Err(NumericError::NotOrthonormal { factor, error });
            }
        }
        let min_s = self.s.min_element();
        if min_s < -tol {
            return Err(NumericError::NegativeSingularValue(min_s));
        }
        Ok(())
    }
}

/// A backend computing the SVD of a 3x3 matrix.
///
/// Closures with the matching signature are backends too, which makes it easy to
/// wrap or replace the default one.
pub trait Svd3 {
    /// Decompose `a` into `U * diag(s) * V^T`.
    fn svd3(&self, a: &DMat3) -> Result<Svd3Set, NumericError>;
}

impl<F> Svd3 for F
where
    F: Fn(&DMat3) -> Result<Svd3Set, NumericError>,
{
    fn svd3(&self, a: &DMat3) -> Result<Svd3Set, NumericError> {
        self(a)
    }
}

/// Default backend using the dense SVD of `faer`.
///
/// Singular values come out sorted in non-increasing order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerSvd3;

impl Svd3 for FaerSvd3 {
    fn svd3(&self, a: &DMat3) -> Result<Svd3Set, NumericError> {
        if !a.is_finite() {
            return Err(NumericError::NonFiniteInput);
        }

        let svd = dmat3_to_faer(a).svd();
        let s = svd.s_diagonal();
        let set = Svd3Set {
            u: faer_to_dmat3(svd.u()),
            s: DVec3::new(s.read(0), s.read(1), s.read(2)),
            v: faer_to_dmat3(svd.v()),
        };

        if !(set.u.is_finite() && set.s.is_finite() && set.v.is_finite()) {
            return Err(NumericError::NonFiniteOutput);
        }

        Ok(set)
    }
}
