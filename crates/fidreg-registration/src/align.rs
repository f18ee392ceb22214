use fidreg_linalg::{
    linalg::check_proper_rotation,
    svd::{FaerSvd3, Svd3},
    NumericError,
};
use glam::DVec3;

use crate::{
    landmark::{match_landmarks, Landmark, PointSet},
    ops::{cross_covariance, demean},
    rotation::{compose_rotation, is_degenerate},
    AlignmentError, CoordinateSpace, RigidTransform,
};

/// Tolerances used by the estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignParams {
    /// Relative length threshold below which the landmarks are considered
    /// collinear or coincident, see [`is_degenerate`].
    pub degeneracy_tolerance: f64,
    /// Maximum deviation from orthonormality accepted for the SVD factors and the
    /// final rotation, and for `|det(R) - 1|`.
    pub orthonormality_tolerance: f64,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: 1e-6,
            orthonormality_tolerance: 1e-9,
        }
    }
}

/// How far a computed transform can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// The landmarks determine a unique rotation.
    Nominal,
    /// The landmarks are collinear or coincident. The rotation is proper but
    /// arbitrary about the degenerate axis.
    Low,
}

/// Distance between a transformed moving landmark and its fixed counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkResidual {
    /// Landmark name.
    pub name: String,
    /// Euclidean distance after alignment.
    pub distance: f64,
}

/// Result of a successful alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Transform mapping the moving landmarks onto the fixed ones.
    pub transform: RigidTransform,
    /// Whether the landmark geometry determines the rotation.
    pub confidence: Confidence,
    /// Singular values of the cross-covariance, as returned by the backend.
    pub singular_values: DVec3,
    /// Per-landmark residuals, in pair order.
    pub residuals: Vec<LandmarkResidual>,
    /// Root mean square of the residuals.
    pub rmse: f64,
    /// Whether the naive solution was a reflection and was corrected.
    pub reflection_corrected: bool,
}

impl Alignment {
    /// Whether the result was flagged as low confidence.
    #[inline]
    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }

    /// Take the transform, treating a low confidence result as an error.
    pub fn into_confident(self) -> Result<RigidTransform, AlignmentError> {
        match self.confidence {
            Confidence::Nominal => Ok(self.transform),
            Confidence::Low => Err(AlignmentError::DegenerateConfiguration),
        }
    }
}

/// Landmark-based rigid alignment with a pluggable SVD backend.
///
/// Every call is independent; the aligner holds no state besides its
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct Aligner<S = FaerSvd3> {
    svd: S,
    params: AlignParams,
}

impl Aligner<FaerSvd3> {
    /// Create an aligner with the default backend and parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Svd3> Aligner<S> {
    /// Create an aligner using `svd` as backend.
    pub fn with_svd(svd: S) -> Self {
        Self {
            svd,
            params: AlignParams::default(),
        }
    }

    /// Replace the parameters.
    pub fn with_params(mut self, params: AlignParams) -> Self {
        self.params = params;
        self
    }

    /// Get the parameters.
    pub fn params(&self) -> &AlignParams {
        &self.params
    }

    /// Estimate the transform aligning the moving half of `point_set` onto the
    /// fixed half in the least-squares sense.
    pub fn estimate(&self, point_set: &PointSet) -> Result<Alignment, AlignmentError> {
        let tol = self.params.orthonormality_tolerance;

        let centered = demean(point_set);
        let a = cross_covariance(&centered);
        if !a.is_finite() {
            return Err(NumericError::NonFiniteInput.into());
        }

        let svd = self.svd.svd3(&a)?;
        svd.validate(tol)?;

        let solution = compose_rotation(&svd);
        check_proper_rotation(&solution.rotation, tol)?;

        let translation = centered.fixed_centroid - solution.rotation * centered.moving_centroid;
        let transform = RigidTransform::from_parts_unchecked(solution.rotation, translation);

        let reference_scale = point_set
            .iter()
            .map(|p| p.moving.length_squared().max(p.fixed.length_squared()))
            .sum::<f64>();
        let confidence =
            match is_degenerate(svd.s(), reference_scale, self.params.degeneracy_tolerance) {
                true => Confidence::Low,
                false => Confidence::Nominal,
            };

        let residuals = point_set
            .iter()
            .map(|p| LandmarkResidual {
                name: p.name.clone(),
                distance: transform.transform_point(p.moving).distance(p.fixed),
            })
            .collect::<Vec<_>>();
        let rmse = (residuals.iter().map(|r| r.distance.powi(2)).sum::<f64>()
            / residuals.len() as f64)
            .sqrt();

        log::debug!(
            "aligned {} landmark pairs: rmse = {:.6}, rotation angle = {:.6} rad, reflection corrected = {}",
            point_set.len(),
            rmse,
            transform.rotation_angle(),
            solution.is_reflection_corrected()
        );
        if confidence == Confidence::Low {
            log::warn!(
                "landmarks are collinear or coincident (singular values {}), rotation is ill-determined",
                svd.s()
            );
        }

        Ok(Alignment {
            transform,
            confidence,
            singular_values: *svd.s(),
            residuals,
            rmse,
            reflection_corrected: solution.is_reflection_corrected(),
        })
    }

    /// Match landmarks by name and estimate the transform.
    ///
    /// Both collections must already be expressed in the same space.
    pub fn align<M: Landmark, F: Landmark>(
        &self,
        moving: &[M],
        fixed: &[F],
    ) -> Result<Alignment, AlignmentError> {
        self.estimate(&match_landmarks(moving, fixed, None)?)
    }

    /// Like [`Aligner::align`], restricted to the landmarks named in `names`.
    pub fn align_named<M: Landmark, F: Landmark>(
        &self,
        moving: &[M],
        fixed: &[F],
        names: &[&str],
    ) -> Result<Alignment, AlignmentError> {
        self.estimate(&match_landmarks(moving, fixed, Some(names))?)
    }

    /// Align and move the frame of the moving dataset.
    ///
    /// `space` is replaced by its transformed value only once the whole
    /// estimation has succeeded; on error it is left untouched. Low confidence
    /// results are applied and reported through [`Alignment::confidence`].
    pub fn align_space<M: Landmark, F: Landmark>(
        &self,
        space: &mut CoordinateSpace,
        moving: &[M],
        fixed: &[F],
    ) -> Result<Alignment, AlignmentError> {
        let alignment = self.align(moving, fixed)?;
        if alignment.is_low_confidence() {
            log::warn!("applying a low confidence alignment to the moving dataset");
        }
        *space = space.transformed(&alignment.transform);
        Ok(alignment)
    }
}

/// Align two landmark collections with the default backend and parameters.
///
/// # Arguments
///
/// * `moving` - Landmarks of the dataset to be moved.
/// * `fixed` - Landmarks of the reference dataset, in the same space as `moving`.
///
/// # Returns
///
/// The alignment, whose transform maps moving positions onto fixed ones.
pub fn align<M: Landmark, F: Landmark>(
    moving: &[M],
    fixed: &[F],
) -> Result<Alignment, AlignmentError> {
    Aligner::new().align(moving, fixed)
}
