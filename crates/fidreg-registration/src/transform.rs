use fidreg_linalg::linalg::check_proper_rotation;
use glam::{DMat3, DVec3};

use crate::AlignmentError;

/// A rotation followed by a translation, `p -> R * p + t`.
///
/// The rotation is always proper: orthonormal with determinant +1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    rotation: DMat3,
    translation: DVec3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// The transform leaving every point in place.
    pub fn identity() -> Self {
        Self {
            rotation: DMat3::IDENTITY,
            translation: DVec3::ZERO,
        }
    }

    /// Create a transform from a rotation and a translation.
    ///
    /// The rotation must be proper within `tol`.
    pub fn from_parts(
        rotation: DMat3,
        translation: DVec3,
        tol: f64,
    ) -> Result<Self, AlignmentError> {
        check_proper_rotation(&rotation, tol)?;
        if !translation.is_finite() {
            return Err(fidreg_linalg::NumericError::NonFiniteInput.into());
        }
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// PRECONDITION: `rotation` has been checked to be proper.
    pub(crate) fn from_parts_unchecked(rotation: DMat3, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Get the rotation matrix.
    #[inline]
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    /// Get the translation vector.
    #[inline]
    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    /// The rotation as row-major nested arrays, `r[row][col]`.
    pub fn rotation_row_major(&self) -> [[f64; 3]; 3] {
        self.rotation.transpose().to_cols_array_2d()
    }

    /// Rotation angle in radians, in `[0, pi]`.
    pub fn rotation_angle(&self) -> f64 {
        let r = &self.rotation;
        let cos = (r.x_axis.x + r.y_axis.y + r.z_axis.z - 1.0) * 0.5;
        cos.clamp(-1.0, 1.0).acos()
    }

    /// Apply the transform to a point.
    #[inline]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Apply the transform to a set of points.
    pub fn transform_points(&self, points: &[DVec3]) -> Vec<DVec3> {
        fidreg_linalg::linalg::transform_points(points, &self.rotation, &self.translation)
    }

    /// The transform undoing this one.
    pub fn inverse(&self) -> Self {
        // R' = R^T, t' = -R^T * t
        let rotation = self.rotation.transpose();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Compose two transforms: the result applies `rhs` first, then `self`.
    pub fn compose(&self, rhs: &RigidTransform) -> Self {
        Self {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}
