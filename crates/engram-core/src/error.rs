//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored record could not be decoded.
    ///
    /// This indicates truncated input, a missing field, or a declared
    /// dimension that disagrees with the payload length.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid vector dimension (zero or above the supported maximum).
    #[error("invalid dimension: {actual} (supported range 1..={max})")]
    InvalidDimension {
        /// The offending dimension.
        actual: usize,
        /// The maximum supported dimension.
        max: usize,
    },

    /// Invalid value in a vector (NaN, Infinity).
    #[error("invalid value at index {index}: {reason}")]
    InvalidValue {
        /// The index of the invalid value.
        index: usize,
        /// The reason the value is invalid.
        reason: &'static str,
    },
}
