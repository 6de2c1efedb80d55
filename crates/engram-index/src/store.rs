//! Durable graph representation over the key-value backend.
//!
//! The graph store owns the persistent shape of the HNSW graph: points,
//! per-layer adjacency, the entry point, the layer and point counters, and
//! per-point metadata. It performs pure data operations; all algorithm logic
//! lives in [`crate::HnswIndex`].
//!
//! Every operation is individually atomic at the key level (inherited from
//! the backend). Multi-key writes are not atomic; a failure mid-insert can
//! leave a point without some of its adjacency, which readers tolerate.

use std::collections::HashMap;

use engram_core::encoding::{
    decode_counter, decode_layer_node, decode_point, encode_counter, encode_layer_node,
    encode_point, keys,
};
use engram_core::{LayerNode, PointId, Vector};
use engram_kv::{batch, KvClient};

use crate::error::{IndexError, IndexResult};

/// Typed graph persistence over one key-value namespace.
pub struct GraphStore<C> {
    kv: C,
    dimension: usize,
}

impl<C: KvClient> GraphStore<C> {
    /// Bind a store to a namespace with the given vector dimension.
    pub fn new(kv: C, dimension: usize) -> Self {
        Self { kv, dimension }
    }

    /// The vector dimension of this index.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The current entry point, or `None` when the index is empty.
    pub fn entry_point(&self) -> IndexResult<Option<PointId>> {
        match self.kv.get(keys::ENTRY_POINT_KEY)? {
            Some(value) => Ok(Some(PointId::new(decode_counter(&value)?))),
            None => Ok(None),
        }
    }

    /// Overwrite the entry point.
    pub fn set_entry_point(&self, id: PointId) -> IndexResult<()> {
        self.kv.set(keys::ENTRY_POINT_KEY, &encode_counter(id.as_u32()))?;
        Ok(())
    }

    /// Number of stored points (the next id to assign). Defaults to 0.
    pub fn num_points(&self) -> IndexResult<u32> {
        self.read_counter(keys::NUM_POINTS_KEY)
    }

    /// Number of populated layers. Defaults to 0.
    pub fn num_layers(&self) -> IndexResult<u32> {
        self.read_counter(keys::NUM_LAYERS_KEY)
    }

    /// Append a new point, assigning the next contiguous id.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DimensionMismatch`] before any write if the
    /// vector does not match the index dimension, and
    /// [`IndexError::ConcurrentWrite`] if the assigned id is already taken.
    pub fn new_point(&self, vector: &Vector) -> IndexResult<PointId> {
        if vector.dimension() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.dimension(),
            });
        }

        let id = PointId::new(self.num_points()?);
        let key = keys::point_key(id);
        if self.kv.get(&key)?.is_some() {
            return Err(IndexError::ConcurrentWrite(format!(
                "point {id} already exists; another writer raced this insert"
            )));
        }

        self.kv.set(&key, &encode_point(id, vector))?;
        self.kv.set(keys::NUM_POINTS_KEY, &encode_counter(id.as_u32() + 1))?;
        Ok(id)
    }

    /// Read one point's vector.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::PointNotFound`] if the record is absent.
    pub fn point(&self, id: PointId) -> IndexResult<Vector> {
        let value =
            self.kv.get(&keys::point_key(id))?.ok_or(IndexError::PointNotFound(id))?;
        let (stored_id, vector) = decode_point(&value)?;
        if stored_id != id {
            return Err(IndexError::Corrupt(engram_core::CoreError::Decode(format!(
                "point record at key {id} carries id {stored_id}"
            ))));
        }
        Ok(vector)
    }

    /// Read several points' vectors, preserving input order.
    ///
    /// # Errors
    ///
    /// Fails fast with [`IndexError::PointNotFound`] naming the first absent
    /// id.
    pub fn points(&self, ids: &[PointId]) -> IndexResult<Vec<Vector>> {
        let point_keys: Vec<String> = ids.iter().map(|&id| keys::point_key(id)).collect();
        let values = batch::get_many_split(&self.kv, &point_keys)?;

        let mut vectors = Vec::with_capacity(ids.len());
        for (&id, value) in ids.iter().zip(values) {
            let value = value.ok_or(IndexError::PointNotFound(id))?;
            let (_, vector) = decode_point(&value)?;
            vectors.push(vector);
        }
        Ok(vectors)
    }

    /// Read one adjacency record.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::LayerNodeNotFound`] if the record is absent.
    pub fn neighbors(&self, layer: u32, id: PointId) -> IndexResult<LayerNode> {
        let value = self
            .kv
            .get(&keys::layer_node_key(layer, id))?
            .ok_or(IndexError::LayerNodeNotFound { layer, id })?;
        Ok(decode_layer_node(&value)?)
    }

    /// Read several adjacency records in one layer.
    ///
    /// # Errors
    ///
    /// Fails fast with [`IndexError::LayerNodeNotFound`] naming the first
    /// absent record.
    pub fn neighbors_many(
        &self,
        layer: u32,
        ids: &[PointId],
    ) -> IndexResult<HashMap<PointId, LayerNode>> {
        let node_keys: Vec<String> =
            ids.iter().map(|&id| keys::layer_node_key(layer, id)).collect();
        let values = batch::get_many_split(&self.kv, &node_keys)?;

        let mut nodes = HashMap::with_capacity(ids.len());
        for (&id, value) in ids.iter().zip(values) {
            let value = value.ok_or(IndexError::LayerNodeNotFound { layer, id })?;
            nodes.insert(id, decode_layer_node(&value)?);
        }
        Ok(nodes)
    }

    /// Overwrite one adjacency record.
    pub fn upsert_neighbors(&self, node: &LayerNode) -> IndexResult<()> {
        self.kv
            .set(&keys::layer_node_key(node.layer, node.id), &encode_layer_node(node))?;
        Ok(())
    }

    /// Overwrite several adjacency records.
    pub fn upsert_neighbors_many(&self, nodes: &[LayerNode]) -> IndexResult<()> {
        let entries: Vec<(String, String)> = nodes
            .iter()
            .map(|node| (keys::layer_node_key(node.layer, node.id), encode_layer_node(node)))
            .collect();
        batch::set_many_split(&self.kv, &entries)?;
        Ok(())
    }

    /// Add a new topmost layer containing only `id`, with empty adjacency.
    ///
    /// Returns the index of the created layer. Single-writer contract:
    /// concurrent calls read-then-write the layer counter and may lose
    /// updates.
    pub fn promote_to_new_layer(&self, id: PointId) -> IndexResult<u32> {
        let layer = self.num_layers()?;
        self.upsert_neighbors(&LayerNode::new(id, layer))?;
        self.kv.set(keys::NUM_LAYERS_KEY, &encode_counter(layer + 1))?;
        Ok(layer)
    }

    /// Read one point's metadata. `None` if never set.
    pub fn metadata(&self, id: PointId) -> IndexResult<Option<String>> {
        Ok(self.kv.get(&keys::metadata_key(id))?)
    }

    /// Read several points' metadata, preserving input order.
    pub fn metadata_many(&self, ids: &[PointId]) -> IndexResult<Vec<Option<String>>> {
        let meta_keys: Vec<String> = ids.iter().map(|&id| keys::metadata_key(id)).collect();
        Ok(batch::get_many_split(&self.kv, &meta_keys)?)
    }

    /// Overwrite one point's metadata.
    pub fn set_metadata(&self, id: PointId, metadata: &str) -> IndexResult<()> {
        self.kv.set(&keys::metadata_key(id), metadata)?;
        Ok(())
    }

    fn read_counter(&self, key: &str) -> IndexResult<u32> {
        match self.kv.get(key)? {
            Some(value) => Ok(decode_counter(&value)?),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_kv::MemoryKv;

    fn store() -> GraphStore<MemoryKv> {
        GraphStore::new(MemoryKv::new(), 4)
    }

    fn vector(value: f32) -> Vector {
        Vector::new(vec![value; 4]).unwrap()
    }

    #[test]
    fn counters_default_to_zero() {
        let store = store();
        assert_eq!(store.num_points().unwrap(), 0);
        assert_eq!(store.num_layers().unwrap(), 0);
        assert_eq!(store.entry_point().unwrap(), None);
    }

    #[test]
    fn new_point_assigns_contiguous_ids() {
        let store = store();
        assert_eq!(store.new_point(&vector(1.0)).unwrap(), PointId::new(0));
        assert_eq!(store.new_point(&vector(2.0)).unwrap(), PointId::new(1));
        assert_eq!(store.new_point(&vector(3.0)).unwrap(), PointId::new(2));
        assert_eq!(store.num_points().unwrap(), 3);
    }

    #[test]
    fn new_point_rejects_wrong_dimension() {
        let store = store();
        let wrong = Vector::new(vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            store.new_point(&wrong),
            Err(IndexError::DimensionMismatch { expected: 4, actual: 2 })
        ));
        assert_eq!(store.num_points().unwrap(), 0);
    }

    #[test]
    fn new_point_detects_raced_writer() {
        let store = store();
        // Simulate another writer having claimed id 0 without bumping the counter
        store.upsert_neighbors(&LayerNode::new(PointId::new(0), 0)).unwrap();
        store
            .kv
            .set("0", &encode_point(PointId::new(0), &vector(9.0)))
            .unwrap();

        assert!(matches!(
            store.new_point(&vector(1.0)),
            Err(IndexError::ConcurrentWrite(_))
        ));
    }

    #[test]
    fn point_roundtrip_and_not_found() {
        let store = store();
        let v = vector(1.5);
        let id = store.new_point(&v).unwrap();

        assert_eq!(store.point(id).unwrap(), v);
        assert!(matches!(
            store.point(PointId::new(9)),
            Err(IndexError::PointNotFound(id)) if id == PointId::new(9)
        ));
    }

    #[test]
    fn points_preserve_order_and_fail_fast() {
        let store = store();
        let a = store.new_point(&vector(1.0)).unwrap();
        let b = store.new_point(&vector(2.0)).unwrap();

        let vectors = store.points(&[b, a]).unwrap();
        assert_eq!(vectors[0], vector(2.0));
        assert_eq!(vectors[1], vector(1.0));

        assert!(matches!(
            store.points(&[a, PointId::new(7), b]),
            Err(IndexError::PointNotFound(id)) if id == PointId::new(7)
        ));
    }

    #[test]
    fn adjacency_roundtrip() {
        let store = store();
        let mut node = LayerNode::new(PointId::new(0), 1);
        node.connect(PointId::new(1), 0.5);
        node.connect(PointId::new(2), 0.25);

        store.upsert_neighbors(&node).unwrap();
        assert_eq!(store.neighbors(1, PointId::new(0)).unwrap(), node);

        assert!(matches!(
            store.neighbors(0, PointId::new(0)),
            Err(IndexError::LayerNodeNotFound { layer: 0, .. })
        ));
    }

    #[test]
    fn neighbors_many_names_missing_record() {
        let store = store();
        store.upsert_neighbors(&LayerNode::new(PointId::new(0), 0)).unwrap();

        let err = store
            .neighbors_many(0, &[PointId::new(0), PointId::new(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::LayerNodeNotFound { layer: 0, id } if id == PointId::new(1)
        ));
    }

    #[test]
    fn promote_stacks_layers() {
        let store = store();
        let id = PointId::new(0);

        assert_eq!(store.promote_to_new_layer(id).unwrap(), 0);
        assert_eq!(store.promote_to_new_layer(id).unwrap(), 1);
        assert_eq!(store.num_layers().unwrap(), 2);

        let node = store.neighbors(1, id).unwrap();
        assert_eq!(node.degree(), 0);
    }

    #[test]
    fn metadata_roundtrip() {
        let store = store();
        let id = store.new_point(&vector(1.0)).unwrap();

        assert_eq!(store.metadata(id).unwrap(), None);
        store.set_metadata(id, "{\"tag\":\"a\"}").unwrap();
        assert_eq!(store.metadata(id).unwrap(), Some("{\"tag\":\"a\"}".to_string()));

        let many = store.metadata_many(&[id, PointId::new(5)]).unwrap();
        assert_eq!(many, vec![Some("{\"tag\":\"a\"}".to_string()), None]);
    }

    #[test]
    fn entry_point_roundtrip() {
        let store = store();
        store.set_entry_point(PointId::new(3)).unwrap();
        assert_eq!(store.entry_point().unwrap(), Some(PointId::new(3)));
    }
}
