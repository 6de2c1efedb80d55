//! Error types for key-value backends.

use thiserror::Error;

/// Errors that can occur in key-value backend operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// The backend could not be opened or created.
    #[error("failed to open backend: {0}")]
    Open(String),

    /// A batch request exceeded the backend's payload bound.
    ///
    /// This is the only error the adapter recovers from locally, by
    /// bisecting the batch. It is never surfaced to index callers.
    #[error("batch exceeds backend size limit ({entries} entries)")]
    SizeLimitExceeded {
        /// Number of entries in the rejected batch.
        entries: usize,
    },

    /// The backend is temporarily unreachable (network, timeout, rate limit).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Any other backend-reported failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KvError {
    /// Returns `true` if this error is transient and reads may be retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io(_))
    }

    /// Returns `true` if this is a batch size-limit rejection.
    #[must_use]
    pub const fn is_size_limit(&self) -> bool {
        matches!(self, Self::SizeLimitExceeded { .. })
    }
}

/// Result type alias for key-value operations.
pub type KvResult<T> = Result<T, KvError>;
