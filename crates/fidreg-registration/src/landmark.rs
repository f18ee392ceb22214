use std::collections::{HashMap, HashSet};

use glam::DVec3;

use crate::AlignmentError;

/// A named 3d position usable as a registration landmark.
///
/// Positions are read as snapshots; the algorithm never holds on to a landmark.
pub trait Landmark {
    /// Name of the landmark, unique within its dataset.
    fn name(&self) -> &str;

    /// Position of the landmark.
    fn position(&self) -> DVec3;
}

impl<L: Landmark + ?Sized> Landmark for &L {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn position(&self) -> DVec3 {
        (**self).position()
    }
}

/// A fiducial mark placed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Fiducial {
    name: String,
    position: DVec3,
}

impl Fiducial {
    /// Create a new fiducial mark.
    pub fn new(name: impl Into<String>, position: impl Into<DVec3>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }
}

impl Landmark for Fiducial {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> DVec3 {
        self.position
    }
}

/// A sub-volume used as a landmark through the center of its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeLandmark {
    name: String,
    min_bound: DVec3,
    max_bound: DVec3,
}

impl VolumeLandmark {
    /// Create a volume landmark from two opposite corners of its bounding box.
    pub fn new(
        name: impl Into<String>,
        corner_a: impl Into<DVec3>,
        corner_b: impl Into<DVec3>,
    ) -> Self {
        let (a, b) = (corner_a.into(), corner_b.into());
        Self {
            name: name.into(),
            min_bound: a.min(b),
            max_bound: a.max(b),
        }
    }

    /// Get the minimum bound of the volume.
    pub fn min_bound(&self) -> DVec3 {
        self.min_bound
    }

    /// Get the maximum bound of the volume.
    pub fn max_bound(&self) -> DVec3 {
        self.max_bound
    }
}

impl Landmark for VolumeLandmark {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> DVec3 {
        (self.min_bound + self.max_bound) * 0.5
    }
}

/// A moving and a fixed position sharing the same landmark name.
#[derive(Debug, Clone, PartialEq)]
pub struct PointPair {
    /// Shared landmark name.
    pub name: String,
    /// Position in the moving dataset.
    pub moving: DVec3,
    /// Position in the fixed dataset.
    pub fixed: DVec3,
}

impl PointPair {
    /// Create a new pair.
    pub fn new(
        name: impl Into<String>,
        moving: impl Into<DVec3>,
        fixed: impl Into<DVec3>,
    ) -> Self {
        Self {
            name: name.into(),
            moving: moving.into(),
            fixed: fixed.into(),
        }
    }
}

/// An ordered sequence of at least [`PointSet::MIN_PAIRS`] landmark pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    pairs: Vec<PointPair>,
}

impl PointSet {
    /// Minimum number of pairs for a determined rotation.
    pub const MIN_PAIRS: usize = 3;

    /// Create a point set, rejecting fewer than [`PointSet::MIN_PAIRS`] pairs or
    /// non-finite coordinates.
    pub fn new(pairs: Vec<PointPair>) -> Result<Self, AlignmentError> {
        if pairs.len() < Self::MIN_PAIRS {
            return Err(AlignmentError::InsufficientLandmarks {
                required: Self::MIN_PAIRS,
                actual: pairs.len(),
            });
        }
        if let Some(pair) = pairs
            .iter()
            .find(|p| !(p.moving.is_finite() && p.fixed.is_finite()))
        {
            return Err(AlignmentError::NonFiniteLandmark(pair.name.clone()));
        }
        Ok(Self { pairs })
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the point set is empty. Never true for a constructed set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Get as reference the pairs.
    pub fn pairs(&self) -> &[PointPair] {
        &self.pairs
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PointPair> {
        self.pairs.iter()
    }

    /// Moving positions, in pair order.
    pub fn moving_points(&self) -> Vec<DVec3> {
        self.pairs.iter().map(|p| p.moving).collect()
    }

    /// Fixed positions, in pair order.
    pub fn fixed_points(&self) -> Vec<DVec3> {
        self.pairs.iter().map(|p| p.fixed).collect()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a PointPair;
    type IntoIter = std::slice::Iter<'a, PointPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

fn index_by_name<'a, L: Landmark>(
    landmarks: &'a [L],
    side: &'static str,
) -> Result<HashMap<&'a str, &'a L>, AlignmentError> {
    let mut index = HashMap::with_capacity(landmarks.len());
    for landmark in landmarks {
        if index.insert(landmark.name(), landmark).is_some() {
            return Err(AlignmentError::DuplicateLandmark {
                name: landmark.name().to_string(),
                side,
            });
        }
    }
    Ok(index)
}

/// Pair landmarks present under the same name in both collections.
///
/// # Arguments
///
/// * `moving` - Landmarks of the dataset to be moved.
/// * `fixed` - Landmarks of the reference dataset, in the same space as `moving`.
/// * `candidates` - Names to consider. `None` considers every name of either
///   collection: the moving names in order, then the fixed-only ones.
///
/// # Returns
///
/// The pairs in candidate order. Names found in only one collection are skipped.
/// Fewer than [`PointSet::MIN_PAIRS`] pairs is an error.
pub fn match_landmarks<M: Landmark, F: Landmark>(
    moving: &[M],
    fixed: &[F],
    candidates: Option<&[&str]>,
) -> Result<PointSet, AlignmentError> {
    let moving_index = index_by_name(moving, "moving")?;
    let fixed_index = index_by_name(fixed, "fixed")?;

    let names: Vec<&str> = match candidates {
        Some(names) => names.to_vec(),
        None => moving
            .iter()
            .map(|l| l.name())
            .chain(
                fixed
                    .iter()
                    .map(|l| l.name())
                    .filter(|name| !moving_index.contains_key(*name)),
            )
            .collect(),
    };

    let mut seen = HashSet::with_capacity(names.len());
    let mut pairs = Vec::with_capacity(names.len());
    for name in names {
        if !seen.insert(name) {
            continue;
        }
        match (moving_index.get(name), fixed_index.get(name)) {
            (Some(m), Some(f)) => pairs.push(PointPair::new(name, m.position(), f.position())),
            _ => log::trace!("skipping landmark `{}` not present in both datasets", name),
        }
    }

    log::debug!(
        "matched {} landmark pairs out of {} candidates",
        pairs.len(),
        seen.len()
    );

    PointSet::new(pairs)
}
