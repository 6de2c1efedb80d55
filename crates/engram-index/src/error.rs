//! Error types for the index crate.

use engram_core::{CoreError, PointId};
use engram_kv::KvError;
use thiserror::Error;

/// Errors that can occur in index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Vector length differs from the index dimension.
    ///
    /// Rejected before any write reaches the backend.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The index dimension.
        expected: usize,
        /// The offending vector's dimension.
        actual: usize,
    },

    /// A point record that must exist was absent.
    #[error("point not found: {0}")]
    PointNotFound(PointId),

    /// An adjacency record that must exist was absent.
    #[error("adjacency not found: layer {layer}, point {id}")]
    LayerNodeNotFound {
        /// The layer of the missing record.
        layer: u32,
        /// The point of the missing record.
        id: PointId,
    },

    /// Rejected configuration or per-call parameter.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Another writer raced this operation; the index may need repair.
    #[error("concurrent write detected: {0}")]
    ConcurrentWrite(String),

    /// A stored record failed to decode. Surfaced as data corruption.
    #[error("corrupt record: {0}")]
    Corrupt(#[from] CoreError),

    /// The backend failed. Transient errors may be retried for reads.
    #[error("backend error: {0}")]
    Backend(#[from] KvError),
}

/// Result type alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
