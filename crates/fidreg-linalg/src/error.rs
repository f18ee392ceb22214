use thiserror::Error;

/// Error type for the numeric routines of this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    /// The input matrix contains NaN or infinite values.
    #[error("input matrix contains non-finite values")]
    NonFiniteInput,

    /// The decomposition produced NaN or infinite values.
    #[error("decomposition produced non-finite values")]
    NonFiniteOutput,

    /// A factor that must be orthonormal is not.
    #[error("{factor} is not orthonormal (max deviation from identity {error:e})")]
    NotOrthonormal {
        /// Name of the offending factor.
        factor: &'static str,
        /// Max-abs entry of `M^T * M - I`.
        error: f64,
    },

    /// The decomposition returned a negative singular value.
    #[error("negative singular value {0:e}")]
    NegativeSingularValue(f64),

    /// A matrix expected to be a proper rotation is not.
    #[error("not a proper rotation: det = {determinant}, orthonormality error = {orthonormality_error:e}")]
    ImproperRotation {
        /// Determinant of the matrix.
        determinant: f64,
        /// Max-abs entry of `R * R^T - I`.
        orthonormality_error: f64,
    },

    /// A rotation axis of zero length was given.
    #[error("cannot compute rotation matrix from a zero vector")]
    ZeroAxis,
}
