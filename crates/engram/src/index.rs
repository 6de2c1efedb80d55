//! Per-contract index handles.

use engram_core::{PointId, Vector};
use engram_index::{HnswIndex, IndexStats, SearchHit};

use crate::context::ContractKv;
use crate::error::EngramError;

/// One k-NN match, with lazy JSON access to its metadata.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    /// The matched point.
    pub id: PointId,
    /// Cosine distance from the query.
    pub distance: f32,
    /// Raw metadata, if any was stored.
    pub metadata: Option<String>,
}

impl SearchMatch {
    /// Parse the metadata as JSON, if present.
    ///
    /// # Errors
    ///
    /// Returns [`EngramError::Metadata`] if the stored metadata is not
    /// valid JSON.
    pub fn metadata_json(&self) -> Result<Option<serde_json::Value>, EngramError> {
        self.metadata.as_deref().map(serde_json::from_str).transpose().map_err(Into::into)
    }
}

impl From<SearchHit> for SearchMatch {
    fn from(hit: SearchHit) -> Self {
        Self { id: hit.id, distance: hit.distance, metadata: hit.metadata }
    }
}

/// A stored point read back out of the index.
#[derive(Debug, Clone)]
pub struct PointRecord {
    /// The stored vector components.
    pub vector: Vec<f32>,
    /// Raw metadata, if any was stored.
    pub metadata: Option<String>,
}

impl PointRecord {
    /// Parse the metadata as JSON, if present.
    ///
    /// # Errors
    ///
    /// Returns [`EngramError::Metadata`] if the stored metadata is not
    /// valid JSON.
    pub fn metadata_json(&self) -> Result<Option<serde_json::Value>, EngramError> {
        self.metadata.as_deref().map(serde_json::from_str).transpose().map_err(Into::into)
    }
}

/// An index handle bound to one contract's key-value namespace.
///
/// Single writer, multiple readers: `insert` takes `&mut self`, searches
/// take `&self`. Metadata is an opaque string to the index; JSON is the
/// convention, and [`insert_json`](Self::insert_json) serializes for you.
pub struct Index {
    inner: HnswIndex<ContractKv>,
}

impl Index {
    pub(crate) fn new(inner: HnswIndex<ContractKv>) -> Self {
        Self { inner }
    }

    /// Insert a vector with optional raw metadata, returning its id.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch before any write if the vector does not
    /// match the index dimension.
    pub fn insert(&mut self, vector: &[f32], metadata: Option<&str>) -> Result<PointId, EngramError> {
        let vector = Vector::new(vector.to_vec())?;
        Ok(self.inner.insert(&vector, metadata)?)
    }

    /// Insert a vector with JSON metadata.
    ///
    /// # Errors
    ///
    /// As [`insert`](Self::insert); serialization of `metadata` cannot fail
    /// for values produced by `serde_json`.
    pub fn insert_json(
        &mut self,
        vector: &[f32],
        metadata: &serde_json::Value,
    ) -> Result<PointId, EngramError> {
        let encoded = serde_json::to_string(metadata)?;
        self.insert(vector, Some(&encoded))
    }

    /// Find the `k` nearest points to `query`, ascending by distance.
    ///
    /// # Errors
    ///
    /// Rejects queries with `k` above the configured `ef_search` and queries
    /// of the wrong dimension.
    pub fn knn_search(&self, query: &[f32], k: usize) -> Result<Vec<SearchMatch>, EngramError> {
        let query = Vector::new(query.to_vec())?;
        let hits = self.inner.knn_search(&query, k)?;
        Ok(hits.into_iter().map(SearchMatch::from).collect())
    }

    /// Read one point's vector and metadata.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for ids that were never assigned.
    pub fn get(&self, id: PointId) -> Result<PointRecord, EngramError> {
        let (vector, metadata) = self.inner.get_vector(id)?;
        Ok(PointRecord { vector: vector.into_vec(), metadata })
    }

    /// Observable index state.
    ///
    /// # Errors
    ///
    /// Propagates backend read failures.
    pub fn stats(&self) -> Result<IndexStats, EngramError> {
        Ok(self.inner.stats()?)
    }

    /// The vector dimension of this index.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.inner.config().dimension
    }
}
