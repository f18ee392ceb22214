use fidreg_linalg::NumericError;
use thiserror::Error;

/// Error types for landmark alignment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignmentError {
    /// Not enough landmark pairs to determine a rotation.
    #[error("alignment requires at least {required} matched landmark pairs, got {actual}")]
    InsufficientLandmarks {
        /// Minimum number of pairs.
        required: usize,
        /// Number of pairs available.
        actual: usize,
    },

    /// A landmark name occurs more than once in one collection.
    #[error("landmark `{name}` appears more than once in the {side} landmarks")]
    DuplicateLandmark {
        /// The repeated name.
        name: String,
        /// Which collection, `moving` or `fixed`.
        side: &'static str,
    },

    /// A matched landmark has a NaN or infinite coordinate.
    #[error("landmark `{0}` has a non-finite position")]
    NonFiniteLandmark(String),

    /// The matched landmarks are collinear or coincident.
    #[error("matched landmarks are collinear or coincident, the rotation is ill-determined")]
    DegenerateConfiguration,

    /// The SVD backend failed or returned an unusable result.
    #[error("numeric failure: {0}")]
    NumericFailure(#[from] NumericError),
}
