use fidreg_linalg::svd::Svd3Set;
use glam::{DMat3, DVec3};

/// Rotation recovered from the SVD of a cross-covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSolution {
    /// The proper rotation `V * D * U^T`.
    pub rotation: DMat3,
    /// The uncorrected candidate `V * U^T`, possibly a reflection.
    pub naive_rotation: DMat3,
    /// Sign of `det(V * U^T)`, the entry placed in `D`.
    pub reflection_sign: f64,
    /// Index of the singular triplet receiving `reflection_sign`.
    pub flipped_axis: usize,
}

impl RotationSolution {
    /// Whether the naive candidate was a reflection and had to be corrected.
    #[inline]
    pub fn is_reflection_corrected(&self) -> bool {
        self.reflection_sign < 0.0
    }
}

/// Index of the smallest singular value. Ties resolve to the later index.
fn smallest_singular_axis(s: &DVec3) -> usize {
    let mut axis = 0;
    for k in 1..3 {
        if s[k] <= s[axis] {
            axis = k;
        }
    }
    axis
}

/// Compose the least-squares proper rotation from the SVD `A = U S V^T` of the
/// cross-covariance `A = Σ moving_i * fixed_i^T`.
///
/// The naive solution `V * U^T` is a reflection whenever `det(U) * det(V) < 0`.
/// In that case the sign of the singular pair with the smallest singular value
/// is flipped, `R = V * D * U^T` with `D = diag(1, 1, -1)` up to ordering. The
/// axis is located by value so the backend's ordering convention does not matter.
///
/// Example:
/// ```
/// use fidreg_linalg::svd::{FaerSvd3, Svd3};
/// use fidreg_registration::rotation::compose_rotation;
/// use glam::{DMat3, DVec3};
///
/// // a mirrored cross-covariance
/// let a = DMat3::from_diagonal(DVec3::new(3.0, 2.0, -1.0));
/// let solution = compose_rotation(&FaerSvd3.svd3(&a).unwrap());
/// assert!(solution.is_reflection_corrected());
/// assert!((solution.rotation.determinant() - 1.0).abs() < 1e-12);
/// ```
pub fn compose_rotation(svd: &Svd3Set) -> RotationSolution {
    let u = *svd.u();
    let v = *svd.v();
    let u_t = u.transpose();

    let naive_rotation = v * u_t;
    let reflection_sign = if naive_rotation.determinant() < 0.0 {
        -1.0
    } else {
        1.0
    };

    let flipped_axis = smallest_singular_axis(svd.s());
    let rotation = if reflection_sign < 0.0 {
        let mut d = DVec3::ONE;
        d[flipped_axis] = reflection_sign;
        v * DMat3::from_diagonal(d) * u_t
    } else {
        naive_rotation
    };

    RotationSolution {
        rotation,
        naive_rotation,
        reflection_sign,
        flipped_axis,
    }
}

/// Check whether the singular values of the cross-covariance describe a
/// collinear or coincident landmark configuration.
///
/// # Arguments
///
/// * `singular_values` - Singular values in any order.
/// * `reference_scale` - Sum of squared landmark distances from the origin,
///   `sum_i max(|m_i|^2, |f_i|^2)`.
/// * `tol` - Relative tolerance on lengths.
///
/// The singular values scale with squared lengths, so `tol` is squared before
/// it is applied to `reference_scale`.
///
/// Coincident: the largest singular value is at most `tol^2 * reference_scale`,
/// i.e. the landmark spread is below `tol` times their distance from the origin.
/// This is the spread below which demeaning loses the geometry to rounding.
/// Collinear: the middle singular value is at most `tol` times the largest.
/// This ratio does not change when both point sets are translated.
pub fn is_degenerate(singular_values: &DVec3, reference_scale: f64, tol: f64) -> bool {
    let mut s = singular_values.abs().to_array();
    s.sort_by(|a, b| b.total_cmp(a));

    if s[0] <= tol * tol * reference_scale {
        return true;
    }
    s[1] <= tol * s[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fidreg_linalg::{
        linalg::{axis_angle_to_rotation_matrix, orthonormality_error},
        svd::{FaerSvd3, Svd3},
        NumericError,
    };

    fn svd(a: &DMat3) -> Svd3Set {
        FaerSvd3.svd3(a).expect("svd should succeed")
    }

    #[test]
    fn test_compose_rotation_proper_input() -> Result<(), NumericError> {
        // A = S * R^T for a rotation R yields R back
        let r = axis_angle_to_rotation_matrix(DVec3::new(0.3, -1.0, 0.5), 0.8)?;
        let a = DMat3::from_diagonal(DVec3::new(5.0, 3.0, 1.0)) * r.transpose();
        let solution = compose_rotation(&svd(&a));

        assert!(!solution.is_reflection_corrected());
        assert_eq!(solution.rotation, solution.naive_rotation);
        assert!(solution.rotation.abs_diff_eq(r, 1e-12));
        Ok(())
    }

    #[test]
    fn test_compose_rotation_flips_smallest_axis() {
        let a = DMat3::from_diagonal(DVec3::new(-1.0, 4.0, 2.0));
        let svd = svd(&a);
        let solution = compose_rotation(&svd);

        assert!(solution.is_reflection_corrected());
        assert!(solution.naive_rotation.determinant() < 0.0);
        assert!((solution.rotation.determinant() - 1.0).abs() < 1e-12);
        assert!(orthonormality_error(&solution.rotation) < 1e-12);

        // the singular value 1 belongs to the x axis of A
        assert!((svd.s()[solution.flipped_axis] - 1.0).abs() < 1e-12);
        assert!(solution.rotation.abs_diff_eq(DMat3::IDENTITY, 1e-12));
    }

    #[test]
    fn test_compose_rotation_ignores_triplet_order() {
        let a = DMat3::from_cols(
            DVec3::new(1.0, 0.2, -0.4),
            DVec3::new(0.3, -2.0, 0.1),
            DVec3::new(0.0, 0.5, 0.7),
        );
        let reference = compose_rotation(&svd(&a));

        // reverse the triplets and negate one singular pair
        let base = svd(&a);
        let (u, s, v) = (*base.u(), *base.s(), *base.v());
        let reordered = Svd3Set::new(
            DMat3::from_cols(u.z_axis, -u.y_axis, u.x_axis),
            DVec3::new(s.z, s.y, s.x),
            DMat3::from_cols(v.z_axis, -v.y_axis, v.x_axis),
        );
        assert!(reordered.reconstruct().abs_diff_eq(a, 1e-12));

        let solution = compose_rotation(&reordered);
        assert_eq!(solution.flipped_axis, 0);
        assert!(solution.rotation.abs_diff_eq(reference.rotation, 1e-12));
    }

    #[test]
    fn test_is_degenerate() {
        assert!(!is_degenerate(&DVec3::new(3.0, 1.0, 0.0), 10.0, 1e-6));
        // collinear
        assert!(is_degenerate(&DVec3::new(3.0, 1e-12, 0.0), 10.0, 1e-6));
        // order does not matter
        assert!(is_degenerate(&DVec3::new(0.0, 1e-12, 3.0), 10.0, 1e-6));
        // coincident
        assert!(is_degenerate(&DVec3::new(1e-20, 1e-20, 0.0), 10.0, 1e-6));
        assert!(is_degenerate(&DVec3::ZERO, 0.0, 1e-6));
        // a unit spread far from the origin is not coincident
        assert!(!is_degenerate(&DVec3::new(1.0, 1.0, 0.25), 1.2e7, 1e-6));
        // the tolerance applies to lengths, not squared lengths
        assert!(!is_degenerate(&DVec3::new(1e-9, 1e-9, 0.0), 1.0, 1e-6));
        assert!(is_degenerate(&DVec3::new(1e-13, 1e-13, 0.0), 1.0, 1e-6));
    }
}
