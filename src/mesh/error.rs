//! Error types for canvas setup and wireframe generation.

use thiserror::Error;

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Which fixed buffer a capacity check was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Index => f.write_str("index"),
        }
    }
}

/// Errors raised while (re)initializing a canvas or generating its buffers.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// A grid axis has fewer than two samples, so no step size exists.
    #[error("degenerate resolution {nx}x{ny}: both axes need at least 2 samples")]
    DegenerateResolution {
        /// Samples along x.
        nx: u32,
        /// Samples along y.
        ny: u32,
    },

    /// The requested grid does not fit in the preallocated storage.
    #[error("{buffer} buffer overflow: need {required} slots, capacity is {capacity}")]
    CapacityExceeded {
        /// Buffer that would overflow.
        buffer: BufferKind,
        /// Slots the canvas needs.
        required: usize,
        /// Slots the buffer holds.
        capacity: usize,
    },

    /// The raw topology code does not name any known connectivity.
    #[error("unknown topology code {0}")]
    UnknownTopology(u32),
}
