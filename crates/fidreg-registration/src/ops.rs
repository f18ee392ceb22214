use fidreg_linalg::linalg::outer;
use glam::{DMat3, DVec3};

use crate::PointSet;

/// Both halves of a point set with their centroids removed.
///
/// Index `i` of `moving` and `fixed` refers to the same pair of the source set.
#[derive(Debug, Clone, PartialEq)]
pub struct CenteredPoints {
    /// Mean of the moving positions.
    pub moving_centroid: DVec3,
    /// Mean of the fixed positions.
    pub fixed_centroid: DVec3,
    /// Moving positions minus `moving_centroid`.
    pub moving: Vec<DVec3>,
    /// Fixed positions minus `fixed_centroid`.
    pub fixed: Vec<DVec3>,
}

/// Arithmetic mean of a set of points, `None` when empty.
///
/// Example:
/// ```
/// use fidreg_registration::ops::centroid;
/// use glam::DVec3;
///
/// let c = centroid(&[DVec3::new(1.0, 2.0, 3.0), DVec3::new(3.0, 4.0, 5.0)]);
/// assert_eq!(c, Some(DVec3::new(2.0, 3.0, 4.0)));
/// ```
pub fn centroid(points: &[DVec3]) -> Option<DVec3> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().fold(DVec3::ZERO, |acc, &p| acc + p) / points.len() as f64)
}

/// Compute the centroid of each half of the point set and subtract it.
pub fn demean(point_set: &PointSet) -> CenteredPoints {
    let moving = point_set.moving_points();
    let fixed = point_set.fixed_points();

    // a point set is never empty
    let moving_centroid = centroid(&moving).unwrap_or(DVec3::ZERO);
    let fixed_centroid = centroid(&fixed).unwrap_or(DVec3::ZERO);

    CenteredPoints {
        moving_centroid,
        fixed_centroid,
        moving: moving.iter().map(|p| *p - moving_centroid).collect(),
        fixed: fixed.iter().map(|p| *p - fixed_centroid).collect(),
    }
}

/// Compute the cross-covariance matrix `A = Σ moving_i * fixed_i^T`.
///
/// Equivalent to `Xm^T * Xf` with one demeaned point per row.
pub fn cross_covariance(centered: &CenteredPoints) -> DMat3 {
    centered
        .moving
        .iter()
        .zip(centered.fixed.iter())
        .fold(DMat3::ZERO, |acc, (&m, &f)| acc + outer(m, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PointPair;
    use approx::assert_relative_eq;

    fn point_set(moving: &[[f64; 3]], fixed: &[[f64; 3]]) -> PointSet {
        let pairs = moving
            .iter()
            .zip(fixed.iter())
            .enumerate()
            .map(|(i, (m, f))| PointPair::new(format!("p{i}"), *m, *f))
            .collect();
        PointSet::new(pairs).expect("valid point set")
    }

    #[test]
    fn test_centroid_empty() {
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_demean() {
        let set = point_set(
            &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [1.0, -1.0, 0.0]],
            &[[7.0, 8.0, 9.0], [10.0, 11.0, 12.0], [1.0, 2.0, 3.0]],
        );
        let centered = demean(&set);

        assert_relative_eq!(centered.moving_centroid.x, 2.0);
        assert_relative_eq!(centered.moving_centroid.y, 2.0);
        assert_relative_eq!(centered.moving_centroid.z, 3.0);
        assert_relative_eq!(centered.fixed_centroid.x, 6.0);
        assert_relative_eq!(centered.fixed_centroid.y, 7.0);
        assert_relative_eq!(centered.fixed_centroid.z, 8.0);

        // pair order is preserved
        assert_eq!(centered.moving[1], DVec3::new(2.0, 3.0, 3.0));
        assert_eq!(centered.fixed[2], DVec3::new(-5.0, -5.0, -5.0));

        let sum_m = centered.moving.iter().fold(DVec3::ZERO, |a, &p| a + p);
        let sum_f = centered.fixed.iter().fold(DVec3::ZERO, |a, &p| a + p);
        assert!(sum_m.abs_diff_eq(DVec3::ZERO, 1e-12));
        assert!(sum_f.abs_diff_eq(DVec3::ZERO, 1e-12));
    }

    #[test]
    fn test_cross_covariance_matches_matrix_product() {
        let set = point_set(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]],
            &[[1.0, 1.0, 0.0], [0.0, 2.0, 1.0], [4.0, 0.0, 0.0], [0.0, 1.0, -1.0]],
        );
        let centered = demean(&set);
        let a = cross_covariance(&centered);

        // A[r][c] = Σ_i moving_i[r] * fixed_i[c]
        for r in 0..3 {
            for c in 0..3 {
                let expected: f64 = centered
                    .moving
                    .iter()
                    .zip(centered.fixed.iter())
                    .map(|(m, f)| m[r] * f[c])
                    .sum();
                assert_relative_eq!(a.col(c)[r], expected, epsilon = 1e-12);
            }
        }
    }
}
