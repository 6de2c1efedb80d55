//! Engram - A Semantic Memory Store
//!
//! Engram ingests embedding vectors with arbitrary metadata, persists them
//! into a content-addressed key-value store, and answers approximate
//! nearest-neighbour queries by cosine distance in embedding space. Each
//! tenant's vectors live in an isolated logical collection (a *contract*)
//! keyed by an opaque identifier.
//!
//! # Quick Start
//!
//! ```
//! use engram::{Engram, HnswConfig};
//!
//! // One context per process; in-memory here, redb-backed in production
//! let engram = Engram::in_memory();
//!
//! // One index per tenant contract
//! let mut index = engram.open_index("tenant-a", HnswConfig::new(4))?;
//!
//! let id = index.insert(&[1.0, 0.0, 0.0, 0.0], Some("{\"tag\":\"a\"}"))?;
//! let hits = index.knn_search(&[1.0, 0.1, 0.0, 0.0], 1)?;
//! assert_eq!(hits[0].id, id);
//! # Ok::<(), engram::EngramError>(())
//! ```
//!
//! # Text in, memories out
//!
//! The [`memory`] module composes an embedding provider with an index, so
//! callers can store and recall text without touching vectors directly. The
//! index core itself never sees text.
//!
//! # Durability
//!
//! [`Engram::open`] backs every contract with a redb database file;
//! [`Engram::in_memory`] keeps contracts in process memory. Either way the
//! key-value namespace exclusively owns all persistent state - reopening an
//! index performs no writes and no in-memory graph is kept.

mod context;
mod error;
mod index;
pub mod memory;

pub use context::Engram;
pub use engram_core::{PointId, Vector};
pub use engram_index::{HnswConfig, IndexError, IndexStats};
pub use error::EngramError;
pub use index::{Index, PointRecord, SearchMatch};
