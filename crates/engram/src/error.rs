//! Error types for the engram crate.

use engram_index::IndexError;
use thiserror::Error;

/// Errors surfaced by the engram crate.
#[derive(Debug, Error)]
pub enum EngramError {
    /// An index operation failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The embedding provider failed to embed a text.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Metadata could not be serialized or parsed as JSON.
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl From<engram_core::CoreError> for EngramError {
    fn from(err: engram_core::CoreError) -> Self {
        Self::Index(IndexError::from(err))
    }
}

impl From<engram_kv::KvError> for EngramError {
    fn from(err: engram_kv::KvError) -> Self {
        Self::Index(IndexError::from(err))
    }
}
