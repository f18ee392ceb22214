#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The estimator pairs landmarks by name, demeans both point sets, builds their
//! cross-covariance and recovers the least-squares rotation from its SVD with a
//! handedness correction, so the result is always a proper rotation.
//!
//! ```
//! use fidreg_registration::{align, Fiducial};
//!
//! let moving = [
//!     Fiducial::new("A", [0.0, 0.0, 0.0]),
//!     Fiducial::new("B", [1.0, 0.0, 0.0]),
//!     Fiducial::new("C", [0.0, 1.0, 0.0]),
//! ];
//! let fixed = [
//!     Fiducial::new("A", [5.0, 5.0, 5.0]),
//!     Fiducial::new("B", [5.0, 6.0, 5.0]),
//!     Fiducial::new("C", [4.0, 5.0, 5.0]),
//! ];
//!
//! let alignment = align(&moving, &fixed).unwrap();
//! let t = alignment.transform.translation();
//! assert!((t - glam::DVec3::splat(5.0)).length() < 1e-9);
//! ```

mod error;
pub use error::AlignmentError;

/// Landmark abstraction and name-based pairing.
pub mod landmark;
pub use landmark::{match_landmarks, Fiducial, Landmark, PointPair, PointSet, VolumeLandmark};

/// Centroid, demeaning and cross-covariance of a point set.
pub mod ops;

/// Rotation recovery from the SVD of the cross-covariance.
pub mod rotation;

mod transform;
pub use transform::RigidTransform;

mod space;
pub use space::CoordinateSpace;

mod align;
pub use align::{align, AlignParams, Aligner, Alignment, Confidence, LandmarkResidual};

pub use fidreg_linalg::svd::{FaerSvd3, Svd3, Svd3Set};
pub use fidreg_linalg::NumericError;
