//! Error types for the query surface.

use thiserror::Error;

pub use raybatch_mesh::MeshError;

/// Errors returned by batch construction and mesh registration.
///
/// Note that a ray which hits nothing is never an error: misses are encoded
/// in the query results via sentinel values (`-1` ids, the miss distance).
#[derive(Error, Debug)]
pub enum Error {
    /// Origin and direction arrays of a batch differ in length.
    #[error("ray batch has {origins} origins but {directions} directions")]
    BatchLengthMismatch {
        /// Number of origins supplied.
        origins: usize,
        /// Number of directions supplied.
        directions: usize,
    },

    /// Per-ray max-distance array does not match the batch length.
    #[error("expected {expected} max distances, got {got}")]
    MaxDistanceLength {
        /// Number of rays in the batch.
        expected: usize,
        /// Number of distances supplied.
        got: usize,
    },

    /// Mesh construction failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for raybatch operations.
pub type Result<T> = std::result::Result<T, Error>;
