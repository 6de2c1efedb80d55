//! The memory-service layer: text in, memories out.
//!
//! Composes an [`EmbeddingProvider`] with an [`Index`] so callers store and
//! recall text. The index core never sees text; it only sees the vectors the
//! provider produces.

use engram_core::PointId;

use crate::error::EngramError;
use crate::index::{Index, SearchMatch};

/// Turns text into fixed-dimension embedding vectors.
///
/// One provider serves one model with a fixed output dimension; the
/// dimension must match the index the provider is composed with.
pub trait EmbeddingProvider {
    /// The output dimension of every embedding.
    fn dimension(&self) -> usize;

    /// Embed a text.
    ///
    /// # Errors
    ///
    /// Returns [`EngramError::Embedding`] when the provider fails (model
    /// unavailable, input rejected, ...).
    fn embed(&self, text: &str) -> Result<Vec<f32>, EngramError>;
}

/// A semantic memory store for one tenant: an embedding provider composed
/// with that tenant's index.
pub struct MemoryStore<P> {
    provider: P,
    index: Index,
}

impl<P: EmbeddingProvider> MemoryStore<P> {
    /// Compose a provider with an index.
    ///
    /// # Errors
    ///
    /// Returns [`EngramError::Embedding`] if the provider's dimension does
    /// not match the index dimension.
    pub fn new(provider: P, index: Index) -> Result<Self, EngramError> {
        if provider.dimension() != index.dimension() {
            return Err(EngramError::Embedding(format!(
                "provider dimension {} does not match index dimension {}",
                provider.dimension(),
                index.dimension()
            )));
        }
        Ok(Self { provider, index })
    }

    /// Store a text with optional JSON metadata, returning its point id.
    ///
    /// # Errors
    ///
    /// Propagates embedding and index failures.
    pub fn remember(
        &mut self,
        text: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<PointId, EngramError> {
        let embedding = self.provider.embed(text)?;
        match metadata {
            Some(value) => self.index.insert_json(&embedding, value),
            None => self.index.insert(&embedding, None),
        }
    }

    /// Recall the `k` stored memories closest to `text`.
    ///
    /// # Errors
    ///
    /// Propagates embedding and index failures.
    pub fn recall(&self, text: &str, k: usize) -> Result<Vec<SearchMatch>, EngramError> {
        let embedding = self.provider.embed(text)?;
        self.index.knn_search(&embedding, k)
    }

    /// The underlying index handle.
    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }
}
