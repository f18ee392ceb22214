use fidreg_linalg::{linalg::check_proper_rotation, NumericError};
use glam::{DMat3, DVec3};

use crate::{AlignmentError, Fiducial, Landmark, RigidTransform};

/// The pose of a dataset: an offset and three orthonormal axes mapping local
/// coordinates to world coordinates.
///
/// `world = offset + x * axes[0] + y * axes[1] + z * axes[2]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    offset: DVec3,
    axes: [DVec3; 3],
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::identity()
    }
}

impl CoordinateSpace {
    /// The space coinciding with world space.
    pub fn identity() -> Self {
        Self {
            offset: DVec3::ZERO,
            axes: [DVec3::X, DVec3::Y, DVec3::Z],
        }
    }

    /// Create a space from its offset and axes.
    ///
    /// The axes must form a right-handed orthonormal basis within `tol`.
    pub fn new(offset: DVec3, axes: [DVec3; 3], tol: f64) -> Result<Self, AlignmentError> {
        check_proper_rotation(&DMat3::from_cols(axes[0], axes[1], axes[2]), tol)?;
        if !offset.is_finite() {
            return Err(NumericError::NonFiniteInput.into());
        }
        Ok(Self { offset, axes })
    }

    /// Get the offset, the world position of the local origin.
    #[inline]
    pub fn offset(&self) -> DVec3 {
        self.offset
    }

    /// Get the axes, expressed in world space.
    #[inline]
    pub fn axes(&self) -> [DVec3; 3] {
        self.axes
    }

    /// Map a local point to world space.
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.offset + self.axes[0] * local.x + self.axes[1] * local.y + self.axes[2] * local.z
    }

    /// Map a world point to local coordinates.
    pub fn to_local(&self, world: DVec3) -> DVec3 {
        let d = world - self.offset;
        DVec3::new(d.dot(self.axes[0]), d.dot(self.axes[1]), d.dot(self.axes[2]))
    }

    /// The space obtained by moving this frame with `transform`.
    ///
    /// Axes are rotated and the offset is transformed as a point, so for every
    /// local point `p`: `new.to_world(p) == transform.transform_point(self.to_world(p))`.
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        let r = transform.rotation();
        Self {
            offset: transform.transform_point(self.offset),
            axes: self.axes.map(|axis| r * axis),
        }
    }

    /// Express landmarks given in this space in world coordinates.
    pub fn landmarks_to_world<L: Landmark>(&self, landmarks: &[L]) -> Vec<Fiducial> {
        landmarks
            .iter()
            .map(|l| Fiducial::new(l.name(), self.to_world(l.position())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fidreg_linalg::linalg::axis_angle_to_rotation_matrix;

    fn rotated_space() -> CoordinateSpace {
        let r = axis_angle_to_rotation_matrix(DVec3::new(1.0, 1.0, 1.0), 0.9).expect("valid axis");
        CoordinateSpace::new(DVec3::new(10.0, -4.0, 2.5), [r.x_axis, r.y_axis, r.z_axis], 1e-12)
            .expect("orthonormal axes")
    }

    #[test]
    fn test_new_rejects_non_orthonormal_axes() {
        let skewed = [DVec3::X, DVec3::new(0.5, 1.0, 0.0), DVec3::Z];
        assert!(CoordinateSpace::new(DVec3::ZERO, skewed, 1e-9).is_err());
        let left_handed = [DVec3::X, DVec3::Y, -DVec3::Z];
        assert!(CoordinateSpace::new(DVec3::ZERO, left_handed, 1e-9).is_err());
    }

    #[test]
    fn test_world_local_roundtrip() {
        let space = rotated_space();
        let p = DVec3::new(1.0, 2.0, -3.0);
        assert!(space.to_local(space.to_world(p)).abs_diff_eq(p, 1e-12));
        assert_eq!(CoordinateSpace::identity().to_world(p), p);
    }

    #[test]
    fn test_transformed_moves_frame() -> Result<(), AlignmentError> {
        let space = rotated_space();
        let r = axis_angle_to_rotation_matrix(DVec3::new(0.0, 1.0, 0.2), -1.3)?;
        let transform = RigidTransform::from_parts(r, DVec3::new(3.0, 0.0, -7.0), 1e-12)?;
        let moved = space.transformed(&transform);

        for p in [DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0), DVec3::new(-5.0, 0.1, 9.0)] {
            let expected = transform.transform_point(space.to_world(p));
            assert!(moved.to_world(p).abs_diff_eq(expected, 1e-12));
        }
        // the original value is untouched
        assert_eq!(space, rotated_space());
        Ok(())
    }

    #[test]
    fn test_landmarks_to_world() {
        let space = rotated_space();
        let local = [Fiducial::new("a", [1.0, 0.0, 0.0])];
        let world = space.landmarks_to_world(&local);
        assert_eq!(world[0].name(), "a");
        assert!(world[0]
            .position()
            .abs_diff_eq(space.offset() + space.axes()[0], 1e-12));
    }
}
