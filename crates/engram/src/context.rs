//! The process-wide Engram context.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use engram_index::{HnswConfig, HnswIndex, IndexError};
use engram_kv::{KvClient, KvError, KvResult, MemoryKv, RedbKv};

use crate::error::EngramError;
use crate::index::Index;

/// The shared backend behind one [`Engram`] context.
enum Backend {
    /// One in-memory namespace per contract, created on first open.
    Memory(Mutex<HashMap<String, Arc<MemoryKv>>>),
    /// A shared redb database; contracts map to namespaces within it.
    Redb(RedbKv),
}

/// A key-value client bound to one contract namespace.
pub(crate) enum ContractKv {
    Memory(Arc<MemoryKv>),
    Redb(RedbKv),
}

impl KvClient for ContractKv {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        match self {
            Self::Memory(kv) => kv.get(key),
            Self::Redb(kv) => kv.get(key),
        }
    }

    fn get_many(&self, keys: &[String]) -> KvResult<Vec<Option<String>>> {
        match self {
            Self::Memory(kv) => kv.get_many(keys),
            Self::Redb(kv) => kv.get_many(keys),
        }
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        match self {
            Self::Memory(kv) => kv.set(key, value),
            Self::Redb(kv) => kv.set(key, value),
        }
    }

    fn set_many(&self, entries: &[(String, String)]) -> KvResult<()> {
        match self {
            Self::Memory(kv) => kv.set_many(entries),
            Self::Redb(kv) => kv.set_many(entries),
        }
    }
}

/// The process-wide context: a shared backend handing out per-contract
/// index handles.
///
/// Create one `Engram` at process start and open an [`Index`] per tenant
/// contract. Opening is idempotent; two handles for the same contract id
/// address the same namespace.
pub struct Engram {
    backend: Backend,
}

impl Engram {
    /// Create a context whose contracts live in process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { backend: Backend::Memory(Mutex::new(HashMap::new())) }
    }

    /// Create a context backed by a redb database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngramError> {
        let root = RedbKv::open(path, "__engram__")?;
        Ok(Self { backend: Backend::Redb(root) })
    }

    /// Bind an index handle to a contract's namespace.
    ///
    /// The configuration must be supplied identically on every open of the
    /// same contract; it is not stored in the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] wrapped in [`EngramError`] if
    /// the configuration is out of range.
    pub fn open_index(&self, contract_id: &str, config: HnswConfig) -> Result<Index, EngramError> {
        let kv = match &self.backend {
            Backend::Memory(contracts) => {
                let mut contracts = contracts
                    .lock()
                    .map_err(|_| IndexError::from(KvError::Backend("lock poisoned".to_string())))?;
                let kv = contracts
                    .entry(contract_id.to_string())
                    .or_insert_with(|| Arc::new(MemoryKv::new()));
                ContractKv::Memory(Arc::clone(kv))
            }
            Backend::Redb(root) => ContractKv::Redb(root.contract(contract_id)?),
        };

        let inner = HnswIndex::open(kv, config)?;
        Ok(Index::new(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_index_is_idempotent() {
        let engram = Engram::in_memory();
        let mut a = engram.open_index("t", HnswConfig::new(4)).unwrap();
        a.insert(&[1.0, 0.0, 0.0, 0.0], None).unwrap();

        let b = engram.open_index("t", HnswConfig::new(4)).unwrap();
        assert_eq!(b.stats().unwrap().num_points, 1);
    }

    #[test]
    fn contracts_are_isolated() {
        let engram = Engram::in_memory();
        let mut a = engram.open_index("tenant-a", HnswConfig::new(4)).unwrap();
        a.insert(&[1.0, 0.0, 0.0, 0.0], None).unwrap();

        let b = engram.open_index("tenant-b", HnswConfig::new(4)).unwrap();
        assert_eq!(b.stats().unwrap().num_points, 0);
    }

    #[test]
    fn invalid_config_is_rejected_at_open() {
        let engram = Engram::in_memory();
        assert!(engram.open_index("t", HnswConfig::new(0)).is_err());
    }
}
