//! In-memory key-value backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::KvClient;
use crate::error::{KvError, KvResult};

/// An in-memory backend holding one namespace.
///
/// Used for tests and ephemeral indices. An optional batch-size cap makes
/// the backend reject oversize `get_many`/`set_many` calls the way a
/// payload-bounded production backend would, which lets tests exercise the
/// adaptive splitting path; [`rejected_batches`](Self::rejected_batches)
/// reports how often the cap was hit.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
    max_batch: Option<usize>,
    rejected_batches: AtomicUsize,
}

impl MemoryKv {
    /// Create an empty namespace with no batch-size bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty namespace that rejects batches larger than `max_batch`.
    #[must_use]
    pub fn with_max_batch(max_batch: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_batch: Some(max_batch),
            rejected_batches: AtomicUsize::new(0),
        }
    }

    /// Number of batches rejected for exceeding the configured cap.
    #[must_use]
    pub fn rejected_batches(&self) -> usize {
        self.rejected_batches.load(Ordering::Relaxed)
    }

    /// Number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Backend`] if the internal lock is poisoned.
    pub fn len(&self) -> KvResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether the namespace is empty.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Backend`] if the internal lock is poisoned.
    pub fn is_empty(&self) -> KvResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> KvResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| KvError::Backend("lock poisoned".to_string()))
    }

    fn check_batch(&self, entries: usize) -> KvResult<()> {
        if let Some(max) = self.max_batch {
            if entries > max {
                self.rejected_batches.fetch_add(1, Ordering::Relaxed);
                return Err(KvError::SizeLimitExceeded { entries });
            }
        }
        Ok(())
    }
}

impl KvClient for MemoryKv {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn get_many(&self, keys: &[String]) -> KvResult<Vec<Option<String>>> {
        self.check_batch(keys.len())?;
        let entries = self.lock()?;
        Ok(keys.iter().map(|key| entries.get(key).cloned()).collect())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&self, entries: &[(String, String)]) -> KvResult<()> {
        self.check_batch(entries.len())?;
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}
