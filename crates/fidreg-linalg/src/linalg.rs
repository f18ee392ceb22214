use glam::{DMat3, DVec3};

use crate::NumericError;

/// Compute the outer product `a * b^T`.
///
/// Column `j` of the result is `a * b[j]`.
#[inline]
pub fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Max-abs entry of `m * m^T - I`.
///
/// Zero for an exactly orthonormal matrix.
pub fn orthonormality_error(m: &DMat3) -> f64 {
    let gram = *m * m.transpose() - DMat3::IDENTITY;
    gram.to_cols_array()
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
}

/// Check that `m` is a proper rotation: orthonormal and with determinant +1.
///
/// # Arguments
///
/// * `m` - The candidate rotation matrix.
/// * `tol` - Tolerance applied to both the orthonormality error and `|det - 1|`.
pub fn check_proper_rotation(m: &DMat3, tol: f64) -> Result<(), NumericError> {
    let determinant = m.determinant();
    let orthonormality_error = orthonormality_error(m);
    if !m.is_finite() || orthonormality_error > tol || (determinant - 1.0).abs() > tol {
        return Err(NumericError::ImproperRotation {
            determinant,
            orthonormality_error,
        });
    }
    Ok(())
}

/// Compute the rotation matrix from an axis and angle.
///
/// The axis does not need to be normalized.
///
/// # Arguments
///
/// * `axis` - The axis of rotation.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix.
///
/// Example:
///
/// ```
/// use fidreg_linalg::linalg::axis_angle_to_rotation_matrix;
/// use glam::DVec3;
///
/// let rotation = axis_angle_to_rotation_matrix(DVec3::Z, std::f64::consts::FRAC_PI_2).unwrap();
/// assert!((rotation * DVec3::X - DVec3::Y).length() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(axis: DVec3, angle: f64) -> Result<DMat3, NumericError> {
    let magnitude = axis.length();
    if !magnitude.is_finite() || magnitude < 1e-10 {
        return Err(NumericError::ZeroAxis);
    }
    Ok(DMat3::from_axis_angle(axis / magnitude, angle))
}

/// Transform a set of points using a rotation and translation.
///
/// Each point is mapped to `rotation * p + translation`.
pub fn transform_points(points: &[DVec3], rotation: &DMat3, translation: &DVec3) -> Vec<DVec3> {
    points.iter().map(|p| *rotation * *p + *translation).collect()
}

/// Copy a glam 3x3 matrix into an owned faer matrix.
pub fn dmat3_to_faer(m: &DMat3) -> faer::Mat<f64> {
    faer::Mat::<f64>::from_fn(3, 3, |i, j| m.col(j)[i])
}

/// Copy the leading 3x3 block of a faer matrix into a glam matrix.
///
/// PRECONDITION: `m` has at least 3 rows and 3 columns.
pub fn faer_to_dmat3(m: faer::MatRef<'_, f64>) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(m.read(0, 0), m.read(1, 0), m.read(2, 0)),
        DVec3::new(m.read(0, 1), m.read(1, 1), m.read(2, 1)),
        DVec3::new(m.read(0, 2), m.read(1, 2), m.read(2, 2)),
    )
}
