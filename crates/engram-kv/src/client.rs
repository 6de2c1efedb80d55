//! The key-value backend trait.

use std::sync::Arc;

use crate::error::KvResult;

/// A string-valued key-value backend bound to one namespace.
///
/// This is the index core's sole dependency on the outside world. One client
/// instance addresses one isolated namespace (one tenant's index); keys from
/// different namespaces never collide.
///
/// # Contract
///
/// - `get`/`set` are single-key; `get_many`/`set_many` are batch.
/// - Batch results preserve input order and length. Missing keys yield
///   `None`, never errors.
/// - Backends with bounded per-request payloads reject oversize batches with
///   [`KvError::SizeLimitExceeded`](crate::KvError::SizeLimitExceeded);
///   callers recover via [`batch`](crate::batch). Other failures propagate
///   unchanged.
/// - Single-key operations are atomic; nothing more is assumed about
///   durability or multi-key atomicity.
pub trait KvClient: Send + Sync {
    /// Get the value stored at `key`, or `None` if absent.
    fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Get the values for `keys`, in order, with `None` for absent keys.
    fn get_many(&self, keys: &[String]) -> KvResult<Vec<Option<String>>>;

    /// Store `value` at `key`, replacing any existing value.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;

    /// Store every `(key, value)` entry, replacing existing values.
    fn set_many(&self, entries: &[(String, String)]) -> KvResult<()>;
}

/// Implement `KvClient` for `Arc<C>` to allow shared ownership of clients.
impl<C: KvClient> KvClient for Arc<C> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[String]) -> KvResult<Vec<Option<String>>> {
        (**self).get_many(keys)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(String, String)]) -> KvResult<()> {
        (**self).set_many(entries)
    }
}
