//! HNSW index configuration.

use engram_core::MAX_DIMENSION;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Configuration parameters for an HNSW index.
///
/// The configuration is fixed when the index is created and must be supplied
/// identically on every open; it is not stored in the index namespace.
///
/// # Parameters
///
/// * `dimension` - Vector dimension of every point in the index.
///
/// * `m` - Target out-degree per node in layers above 0.
///   Typical values: 5-48. Higher values give better recall but write more
///   adjacency data.
///
/// * `m_max0` - Out-degree cap in layer 0 (the densest layer).
///   Typically set to `2 * m`.
///
/// * `ef_construction` - Beam width during insert.
///   Higher values give better graph quality but slower construction.
///   Typical values: 100-500.
///
/// * `ef_search` - Beam width during search. Queries with `k > ef_search`
///   are rejected. Typical values: 10-500.
///
/// * `ml` - Level multiplier for layer assignment.
///   Typically `1 / ln(m)`. Affects the distribution of nodes across layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Vector dimension of the index.
    pub dimension: usize,
    /// Target out-degree per node (M parameter).
    pub m: usize,
    /// Out-degree cap in layer 0 (typically 2 * M).
    pub m_max0: usize,
    /// Beam width for construction.
    pub ef_construction: usize,
    /// Beam width for search.
    pub ef_search: usize,
    /// Level multiplier (1 / ln(M)).
    pub ml: f64,
}

impl HnswConfig {
    /// Create a configuration for the given vector dimension.
    ///
    /// Other parameters are set to sensible defaults:
    /// - `m` = 16, `m_max0` = 32
    /// - `ef_construction` = 200
    /// - `ef_search` = 50
    /// - `ml` = 1 / ln(16)
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // m is small, no precision loss
    pub fn new(dimension: usize) -> Self {
        let m = 16;
        Self {
            dimension,
            m,
            m_max0: m * 2,
            ef_construction: 200,
            ef_search: 50,
            ml: 1.0 / (m as f64).ln(),
        }
    }

    /// Set the M parameter, recomputing `m_max0` and `ml`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self.m_max0 = m * 2;
        self.ml = 1.0 / (m as f64).max(2.0).ln();
        self
    }

    /// Set the beam width for construction.
    #[must_use]
    pub const fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    /// Set the beam width for search.
    #[must_use]
    pub const fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    /// The out-degree cap for a layer: `m_max0` at layer 0, `m` above.
    #[must_use]
    pub const fn m_max(&self, layer: u32) -> usize {
        if layer == 0 {
            self.m_max0
        } else {
            self.m
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if any parameter is out of range.
    pub fn validate(&self) -> IndexResult<()> {
        if self.dimension == 0 || self.dimension > MAX_DIMENSION {
            return Err(IndexError::InvalidConfig(format!(
                "dimension {} out of range 1..={MAX_DIMENSION}",
                self.dimension
            )));
        }
        if self.m < 2 || self.m > 128 {
            return Err(IndexError::InvalidConfig(format!("m {} out of range 2..=128", self.m)));
        }
        if self.m_max0 < self.m {
            return Err(IndexError::InvalidConfig(format!(
                "m_max0 {} below m {}",
                self.m_max0, self.m
            )));
        }
        if self.ef_construction == 0 {
            return Err(IndexError::InvalidConfig("ef_construction must be positive".to_string()));
        }
        if self.ef_search == 0 {
            return Err(IndexError::InvalidConfig("ef_search must be positive".to_string()));
        }
        Ok(())
    }
}
