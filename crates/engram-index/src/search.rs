//! Layer search and neighbor selection.
//!
//! `search_layer` is the greedy best-first search within a single layer
//! (Algorithm 2 of the HNSW paper); `select_neighbors` is the simple
//! selection heuristic (Algorithm 4). Both operate through a per-operation
//! vector cache so each point's vector is fetched from the backend at most
//! once per operation, in batches.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use engram_core::{PointId, Vector};
use engram_kv::KvClient;

use crate::distance::cosine_distance;
use crate::error::IndexResult;
use crate::store::GraphStore;

/// A point with its distance to the current query, used for heap operations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub id: PointId,
    pub distance: f32,
}

impl Candidate {
    pub(crate) const fn new(id: PointId, distance: f32) -> Self {
        Self { id, distance }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.partial_cmp(&other.distance).unwrap_or(Ordering::Equal)
    }
}

/// Per-operation read-through cache of point vectors.
///
/// Distances are evaluated many times per search; the cache keeps each
/// backend read to one batched fetch per frontier expansion. The cache lives
/// for a single operation only, so write-through invalidation never arises.
pub(crate) struct VectorCache<'a, C> {
    store: &'a GraphStore<C>,
    vectors: HashMap<PointId, Vector>,
}

impl<'a, C: KvClient> VectorCache<'a, C> {
    pub(crate) fn new(store: &'a GraphStore<C>) -> Self {
        Self { store, vectors: HashMap::new() }
    }

    /// Seed the cache, e.g. with a vector not yet visible in the backend.
    pub(crate) fn seed(&mut self, id: PointId, vector: Vector) {
        self.vectors.insert(id, vector);
    }

    /// Batch-fetch any of `ids` not already cached.
    pub(crate) fn prefetch(&mut self, ids: &[PointId]) -> IndexResult<()> {
        let missing: Vec<PointId> =
            ids.iter().copied().filter(|id| !self.vectors.contains_key(id)).collect();
        if missing.is_empty() {
            return Ok(());
        }

        let vectors = self.store.points(&missing)?;
        for (id, vector) in missing.into_iter().zip(vectors) {
            self.vectors.insert(id, vector);
        }
        Ok(())
    }

    /// Distance from `query` to the point `id`.
    pub(crate) fn distance(&mut self, query: &Vector, id: PointId) -> IndexResult<f32> {
        if !self.vectors.contains_key(&id) {
            let vector = self.store.point(id)?;
            self.vectors.insert(id, vector);
        }
        // Present after the insert above
        let vector = &self.vectors[&id];
        Ok(cosine_distance(query.as_slice(), vector.as_slice()))
    }
}

/// Greedy best-first search within one layer.
///
/// Expands the closest unexplored candidate until the closest is no better
/// than the furthest of the `ef` best results found so far, and returns the
/// results in ascending distance order.
pub(crate) fn search_layer<C: KvClient>(
    cache: &mut VectorCache<'_, C>,
    query: &Vector,
    entry_points: &[Candidate],
    ef: usize,
    layer: u32,
) -> IndexResult<Vec<Candidate>> {
    let mut visited: HashSet<PointId> = entry_points.iter().map(|c| c.id).collect();
    let mut candidates: BinaryHeap<Reverse<Candidate>> =
        entry_points.iter().map(|&c| Reverse(c)).collect();
    let mut results: BinaryHeap<Candidate> = entry_points.iter().copied().collect();

    while results.len() > ef {
        results.pop();
    }

    while let Some(Reverse(current)) = candidates.pop() {
        let furthest = match results.peek() {
            Some(f) => f.distance,
            None => break,
        };
        if current.distance > furthest {
            break;
        }

        let node = cache.store.neighbors(layer, current.id)?;
        let unvisited: Vec<PointId> =
            node.neighbors.keys().copied().filter(|id| visited.insert(*id)).collect();
        cache.prefetch(&unvisited)?;

        for id in unvisited {
            let distance = cache.distance(query, id)?;
            let furthest = results.peek().map_or(f32::INFINITY, |f| f.distance);

            if distance < furthest || results.len() < ef {
                let candidate = Candidate::new(id, distance);
                candidates.push(Reverse(candidate));
                results.push(candidate);
                if results.len() > ef {
                    results.pop();
                }
            }
        }
    }

    Ok(results.into_sorted_vec())
}

/// The simple neighbor-selection heuristic.
///
/// Consumes `candidates` in ascending distance order. A candidate is kept if
/// the result set is empty or it beats the closest result kept so far;
/// otherwise it lands in a discarded reservoir. Selection stops at `m_max`
/// kept entries, and with `keep_pruned` the reservoir refills the result set
/// up to `m_max` in ascending order.
pub(crate) fn select_neighbors(
    candidates: &[Candidate],
    m_max: usize,
    keep_pruned: bool,
) -> Vec<Candidate> {
    let mut ordered: Vec<Candidate> = candidates.to_vec();
    ordered.sort();

    let mut results: Vec<Candidate> = Vec::with_capacity(m_max);
    let mut discarded: Vec<Candidate> = Vec::new();

    for &candidate in &ordered {
        if results.len() >= m_max {
            break;
        }
        let best = results.iter().map(|c| c.distance).fold(f32::INFINITY, f32::min);
        if results.is_empty() || candidate.distance < best {
            results.push(candidate);
        } else {
            discarded.push(candidate);
        }
    }

    if keep_pruned {
        for &candidate in &discarded {
            if results.len() >= m_max {
                break;
            }
            results.push(candidate);
        }
        results.sort();
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u32, distance: f32) -> Candidate {
        Candidate::new(PointId::new(id), distance)
    }

    #[test]
    fn candidates_order_by_distance() {
        let mut heap = BinaryHeap::new();
        heap.push(candidate(0, 0.5));
        heap.push(candidate(1, 0.1));
        heap.push(candidate(2, 0.9));

        // Max-heap: furthest on top
        assert_eq!(heap.pop().unwrap().id, PointId::new(2));

        let mut min_heap = BinaryHeap::new();
        min_heap.push(Reverse(candidate(0, 0.5)));
        min_heap.push(Reverse(candidate(1, 0.1)));
        assert_eq!(min_heap.pop().unwrap().0.id, PointId::new(1));
    }

    #[test]
    fn select_keeps_the_closest_up_to_bound() {
        let candidates: Vec<Candidate> =
            (0..10).map(|i| candidate(i, i as f32 * 0.1)).collect();

        let selected = select_neighbors(&candidates, 4, true);
        assert_eq!(selected.len(), 4);
        let ids: Vec<u32> = selected.iter().map(|c| c.id.as_u32()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn select_without_refill_keeps_only_strictly_improving() {
        let candidates =
            vec![candidate(0, 0.1), candidate(1, 0.2), candidate(2, 0.3)];

        // Without the reservoir refill only the first (closest) survives:
        // later candidates never beat the closest result
        let selected = select_neighbors(&candidates, 3, false);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, PointId::new(0));

        let refilled = select_neighbors(&candidates, 3, true);
        assert_eq!(refilled.len(), 3);
    }

    #[test]
    fn select_handles_fewer_candidates_than_bound() {
        let candidates = vec![candidate(5, 0.7)];
        let selected = select_neighbors(&candidates, 8, true);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, PointId::new(5));
    }

    #[test]
    fn select_of_empty_is_empty() {
        assert!(select_neighbors(&[], 4, true).is_empty());
    }
}
