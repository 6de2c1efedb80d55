//! Engram KV
//!
//! This crate provides the key-value backend abstraction for Engram.
//!
//! # Overview
//!
//! The index core operates over an untrusted string-valued key-value backend
//! with four primitive operations: `get`, `get_many`, `set`, `set_many`. The
//! backend gives no guarantee about how large a batch it accepts; oversize
//! batches fail with a typed error and callers are expected to split.
//!
//! This crate owns:
//!
//! - [`KvClient`] - the backend trait, one implementation per backend
//! - [`KvError`] - the typed failure surface, including
//!   [`KvError::SizeLimitExceeded`]
//! - [`batch`] - adaptive bisection so arbitrarily large batches succeed
//! - [`backends`] - the in-memory backend (tests, ephemeral indices) and the
//!   redb-backed durable backend
//!
//! # Example
//!
//! ```
//! use engram_kv::{batch, KvClient, MemoryKv};
//!
//! let kv = MemoryKv::new();
//! kv.set("greeting", "hello")?;
//! assert_eq!(kv.get("greeting")?, Some("hello".to_string()));
//!
//! let entries: Vec<(String, String)> =
//!     (0..100).map(|i| (format!("k{i}"), format!("v{i}"))).collect();
//! batch::set_many_split(&kv, &entries)?;
//! # Ok::<(), engram_kv::KvError>(())
//! ```

pub mod backends;
pub mod batch;
mod client;
mod error;

pub use backends::{MemoryKv, RedbKv};
pub use client::KvClient;
pub use error::{KvError, KvResult};
