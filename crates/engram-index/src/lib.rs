//! Engram Index
//!
//! HNSW (Hierarchical Navigable Small World) vector index over a string-valued
//! key-value backend.
//!
//! # Architecture
//!
//! The index holds no long-lived in-memory graph: the key-value namespace
//! exclusively owns all persistent state, every read goes through the
//! [`GraphStore`], and every mutation is a write-through. The engine layers
//! are, bottom up:
//!
//! - [`distance`] - SIMD cosine distance primitives
//! - [`GraphStore`] - typed, batch-capable graph persistence (points,
//!   per-layer adjacency, entry point, counters, metadata)
//! - [`HnswIndex`] - the algorithmic core: probabilistic layer assignment,
//!   greedy layer search, neighbor selection with degree-bounded pruning,
//!   insert, and k-NN search
//!
//! # Concurrency
//!
//! Single writer, multiple readers per index. Searches never lock and may
//! race with an in-flight insert; they observe a valid set of points with
//! correct vectors and metadata, though recall may dip until the insert
//! completes. Concurrent inserts to the same index are a caller error.
//!
//! # Example
//!
//! ```
//! use engram_index::{HnswConfig, HnswIndex};
//! use engram_core::Vector;
//! use engram_kv::MemoryKv;
//!
//! let mut index = HnswIndex::open(MemoryKv::new(), HnswConfig::new(4))?;
//!
//! let id = index.insert(&Vector::new(vec![1.0, 0.0, 0.0, 0.0])?, None)?;
//! let hits = index.knn_search(&Vector::new(vec![1.0, 0.1, 0.0, 0.0])?, 1)?;
//! assert_eq!(hits[0].id, id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod distance;
mod error;
mod hnsw;
mod level;
mod search;
mod store;

pub use config::HnswConfig;
pub use error::{IndexError, IndexResult};
pub use hnsw::{HnswIndex, IndexStats, SearchHit};
pub use store::GraphStore;
