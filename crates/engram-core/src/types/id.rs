//! Unique identifiers for stored points.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a point in the index.
///
/// Ids are assigned contiguously starting at zero; the index-global point
/// counter always equals the next free id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(u32);

impl PointId {
    /// Create a new `PointId` from a raw u32 value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for PointId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
