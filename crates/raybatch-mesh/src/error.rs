//! Error types for mesh construction.

use thiserror::Error;

/// Errors that can occur while building a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Implicit triangle soup whose vertex count is not a multiple of 3.
    #[error("triangle soup needs a multiple of 3 vertices, got {0}")]
    SoupLength(usize),

    /// Element index data whose row length selects no known element type.
    #[error("element rows must have 4 (tetrahedron) or 8 (hexahedron) entries, got {0}")]
    ElementRow(usize),

    /// Flat element index data that does not divide evenly into rows.
    #[error("element index count {count} is not a multiple of the row length {row}")]
    RaggedElements {
        /// Total number of indices supplied.
        count: usize,
        /// Requested row length.
        row: usize,
    },

    /// An index referencing a vertex beyond the vertex array.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

/// Result type for mesh construction.
pub type Result<T> = std::result::Result<T, MeshError>;
