//! The HNSW index engine.
//!
//! Implements the algorithms from the HNSW paper over the [`GraphStore`]:
//! probabilistic layer assignment, greedy routing from the top layer, beam
//! search and neighbor selection during insert, and k-NN query. The engine
//! knows nothing about the concrete backend.
//!
//! ## Write ordering
//!
//! Within one insert, writes reach the backend in this order: point record,
//! metadata, per-layer adjacency (new node then updated peers, top layer
//! down), layer promotions, entry point. Multi-key writes are not atomic; a
//! failure mid-insert leaves the new point as an orphan that is reachable
//! only through whichever adjacency writes completed. Searches are read-only
//! and may run concurrently with one insert; concurrent inserts are a caller
//! error.

use engram_core::{LayerNode, PointId, Vector};
use engram_kv::KvClient;
use tracing::debug;

use crate::config::HnswConfig;
use crate::error::{IndexError, IndexResult};
use crate::level::LevelGenerator;
use crate::search::{search_layer, select_neighbors, Candidate, VectorCache};
use crate::store::GraphStore;

/// One k-NN search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched point.
    pub id: PointId,
    /// Cosine distance from the query to the point.
    pub distance: f32,
    /// The point's metadata, if any was stored.
    pub metadata: Option<String>,
}

/// Observable index state.
#[derive(Debug, Clone)]
pub struct IndexStats {
    /// Number of stored points.
    pub num_points: u32,
    /// Number of populated layers.
    pub num_layers: u32,
    /// The configuration the index was opened with.
    pub config: HnswConfig,
}

/// HNSW (Hierarchical Navigable Small World) index over a key-value backend.
///
/// The engine holds no long-lived graph state: every operation reads what it
/// needs from the [`GraphStore`] and writes through. Opening an index is
/// idempotent and performs no writes.
pub struct HnswIndex<C> {
    store: GraphStore<C>,
    config: HnswConfig,
    levels: LevelGenerator,
}

impl<C: KvClient> HnswIndex<C> {
    /// Bind an index to a key-value namespace.
    ///
    /// The configuration must be identical on every open of the same
    /// namespace; it is not persisted there.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if the configuration is out of
    /// range.
    pub fn open(kv: C, config: HnswConfig) -> IndexResult<Self> {
        config.validate()?;
        let levels = LevelGenerator::new(config.ml);
        Ok(Self { store: GraphStore::new(kv, config.dimension), config, levels })
    }

    /// Like [`open`](Self::open), with a fixed seed for layer assignment.
    ///
    /// Useful for reproducible index builds.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if the configuration is out of
    /// range.
    pub fn open_seeded(kv: C, config: HnswConfig, seed: u64) -> IndexResult<Self> {
        config.validate()?;
        let levels = LevelGenerator::with_seed(config.ml, seed);
        Ok(Self { store: GraphStore::new(kv, config.dimension), config, levels })
    }

    /// The configuration this index was opened with.
    #[must_use]
    pub fn config(&self) -> &HnswConfig {
        &self.config
    }

    /// The underlying graph store.
    #[must_use]
    pub fn store(&self) -> &GraphStore<C> {
        &self.store
    }

    /// Insert a vector with optional metadata, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] before any write if the
    /// vector does not match the index dimension. Backend errors after the
    /// point record committed leave the point partially linked; see the
    /// module documentation.
    pub fn insert(&mut self, vector: &Vector, metadata: Option<&str>) -> IndexResult<PointId> {
        self.check_dimension(vector)?;
        let target_layer = self.levels.next_level();
        self.insert_at_level(vector, metadata, target_layer)
    }

    /// Insert at a fixed target layer (layer assignment already done).
    pub(crate) fn insert_at_level(
        &mut self,
        vector: &Vector,
        metadata: Option<&str>,
        target_layer: u32,
    ) -> IndexResult<PointId> {
        self.check_dimension(vector)?;

        let entry = self.store.entry_point()?;
        let num_layers = self.store.num_layers()?;

        let id = self.store.new_point(vector)?;
        if let Some(meta) = metadata {
            self.store.set_metadata(id, meta)?;
        }

        let Some(entry_id) = entry else {
            // First point: it alone populates every layer up to its target
            for _ in 0..=target_layer {
                self.store.promote_to_new_layer(id)?;
            }
            self.store.set_entry_point(id)?;
            debug!(%id, target_layer, "inserted first point");
            return Ok(id);
        };

        let top_layer = num_layers.checked_sub(1).ok_or_else(|| {
            IndexError::ConcurrentWrite("entry point exists but layer count is zero".to_string())
        })?;
        let mut cache = VectorCache::new(&self.store);
        cache.seed(id, vector.clone());

        let mut eps = vec![Candidate::new(entry_id, cache.distance(vector, entry_id)?)];

        // Route greedily from the top layer down to just above the target
        for layer in ((target_layer + 1)..=top_layer).rev() {
            eps = search_layer(&mut cache, vector, &eps, 1, layer)?;
        }

        // Link into every layer the new point joins
        for layer in (0..=top_layer.min(target_layer)).rev() {
            let found =
                search_layer(&mut cache, vector, &eps, self.config.ef_construction, layer)?;

            let m_max = self.config.m_max(layer);
            let chosen = select_neighbors(&found, m_max, true);
            let chosen_ids: Vec<PointId> = chosen.iter().map(|c| c.id).collect();
            let mut peers = self.store.neighbors_many(layer, &chosen_ids)?;

            let mut node = LayerNode::new(id, layer);
            for c in &chosen {
                node.connect(c.id, c.distance);
                let peer = peers
                    .get_mut(&c.id)
                    .ok_or(IndexError::LayerNodeNotFound { layer, id: c.id })?;
                peer.connect(id, c.distance);
            }

            // Re-select for peers pushed over the degree bound, using their
            // cached edge distances as candidates
            for peer in peers.values_mut() {
                if peer.degree() > m_max {
                    let edges: Vec<Candidate> = peer
                        .neighbors
                        .iter()
                        .map(|(&neighbor, &distance)| Candidate::new(neighbor, distance))
                        .collect();
                    let kept = select_neighbors(&edges, m_max, true);
                    peer.neighbors = kept.into_iter().map(|c| (c.id, c.distance)).collect();
                }
            }

            self.store.upsert_neighbors(&node)?;
            let updated: Vec<LayerNode> = peers.into_values().collect();
            self.store.upsert_neighbors_many(&updated)?;

            eps = found;
        }

        // Grow the graph when the target layer is above every populated layer
        if target_layer >= num_layers {
            for _ in num_layers..=target_layer {
                self.store.promote_to_new_layer(id)?;
            }
            self.store.set_entry_point(id)?;
        }

        debug!(%id, target_layer, "inserted point");
        Ok(id)
    }

    /// Find the `k` nearest points to `query`, ascending by distance.
    ///
    /// Returns an empty list on an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if `k` exceeds the configured
    /// `ef_search`, and [`IndexError::DimensionMismatch`] if the query does
    /// not match the index dimension. Search never mutates state; backend
    /// errors propagate.
    pub fn knn_search(&self, query: &Vector, k: usize) -> IndexResult<Vec<SearchHit>> {
        self.check_dimension(query)?;
        if k > self.config.ef_search {
            return Err(IndexError::InvalidConfig(format!(
                "k {k} exceeds ef_search {}",
                self.config.ef_search
            )));
        }

        let Some(entry_id) = self.store.entry_point()? else {
            return Ok(Vec::new());
        };
        let num_layers = self.store.num_layers()?;

        let mut cache = VectorCache::new(&self.store);
        let mut eps = vec![Candidate::new(entry_id, cache.distance(query, entry_id)?)];

        for layer in (1..num_layers).rev() {
            eps = search_layer(&mut cache, query, &eps, 1, layer)?;
        }

        let mut results = search_layer(&mut cache, query, &eps, self.config.ef_search, 0)?;
        results.truncate(k);

        let ids: Vec<PointId> = results.iter().map(|c| c.id).collect();
        let metadata = self.store.metadata_many(&ids)?;
        debug!(k, hits = results.len(), "knn search");

        Ok(results
            .into_iter()
            .zip(metadata)
            .map(|(c, metadata)| SearchHit { id: c.id, distance: c.distance, metadata })
            .collect())
    }

    /// Read one point's vector and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::PointNotFound`] if `id` was never assigned.
    pub fn get_vector(&self, id: PointId) -> IndexResult<(Vector, Option<String>)> {
        if id.as_u32() >= self.store.num_points()? {
            return Err(IndexError::PointNotFound(id));
        }
        let vector = self.store.point(id)?;
        let metadata = self.store.metadata(id)?;
        Ok((vector, metadata))
    }

    /// Observable index state.
    pub fn stats(&self) -> IndexResult<IndexStats> {
        Ok(IndexStats {
            num_points: self.store.num_points()?,
            num_layers: self.store.num_layers()?,
            config: self.config.clone(),
        })
    }

    fn check_dimension(&self, vector: &Vector) -> IndexResult<()> {
        if vector.dimension() != self.config.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.dimension(),
            });
        }
        Ok(())
    }
}
