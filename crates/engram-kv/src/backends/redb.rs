//! Redb-backed durable key-value backend.
//!
//! Redb requires static table names, so all namespaces share one physical
//! table and the contract id is prefixed onto every key, separated by a NUL
//! byte. Two clients with distinct contract ids never observe each other's
//! keys.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use crate::client::KvClient;
use crate::error::{KvError, KvResult};

/// The physical table that stores all namespaces.
const DATA_TABLE: TableDefinition<'static, &str, &str> = TableDefinition::new("engram_data");

/// Separator between the contract id and the key in the physical key.
const NAMESPACE_SEPARATOR: char = '\u{0}';

/// A durable backend bound to one contract namespace within a redb database.
///
/// The database handle is shared; [`contract`](Self::contract) derives a
/// client for a sibling namespace without reopening the file.
///
/// # Example
///
/// ```no_run
/// use engram_kv::{KvClient, RedbKv};
///
/// let kv = RedbKv::open("memories.redb", "tenant-a")?;
/// kv.set("greeting", "hello")?;
///
/// let other = kv.contract("tenant-b")?;
/// assert_eq!(other.get("greeting")?, None);
/// # Ok::<(), engram_kv::KvError>(())
/// ```
#[derive(Clone)]
pub struct RedbKv {
    db: Arc<Database>,
    namespace: String,
}

impl RedbKv {
    /// Open or create a database at `path`, bound to `contract_id`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Open`] if the database cannot be opened or the
    /// contract id is invalid.
    pub fn open(path: impl AsRef<Path>, contract_id: &str) -> KvResult<Self> {
        validate_contract_id(contract_id)?;
        let db = Database::builder()
            .create(path.as_ref())
            .map_err(|e| KvError::Open(e.to_string()))?;
        Ok(Self { db: Arc::new(db), namespace: contract_id.to_string() })
    }

    /// Create an in-memory database bound to `contract_id`.
    ///
    /// The data is lost when the last derived client is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Open`] if the database cannot be created or the
    /// contract id is invalid.
    pub fn in_memory(contract_id: &str) -> KvResult<Self> {
        validate_contract_id(contract_id)?;
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| KvError::Open(e.to_string()))?;
        Ok(Self { db: Arc::new(db), namespace: contract_id.to_string() })
    }

    /// Derive a client for another contract namespace in the same database.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Open`] if the contract id is invalid.
    pub fn contract(&self, contract_id: &str) -> KvResult<Self> {
        validate_contract_id(contract_id)?;
        Ok(Self { db: Arc::clone(&self.db), namespace: contract_id.to_string() })
    }

    /// The contract id this client is bound to.
    #[must_use]
    pub fn contract_id(&self) -> &str {
        &self.namespace
    }

    fn scoped_key(&self, key: &str) -> String {
        let mut scoped = String::with_capacity(self.namespace.len() + 1 + key.len());
        scoped.push_str(&self.namespace);
        scoped.push(NAMESPACE_SEPARATOR);
        scoped.push_str(key);
        scoped
    }

    fn read_one(
        table: &impl ReadableTable<&'static str, &'static str>,
        key: &str,
    ) -> KvResult<Option<String>> {
        match table.get(key) {
            Ok(Some(guard)) => Ok(Some(guard.value().to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(KvError::Backend(e.to_string())),
        }
    }
}

impl KvClient for RedbKv {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.get_many(&[key.to_string()]).map(|mut values| values.pop().flatten())
    }

    fn get_many(&self, keys: &[String]) -> KvResult<Vec<Option<String>>> {
        let tx = self.db.begin_read().map_err(|e| KvError::Backend(e.to_string()))?;
        let table = match tx.open_table(DATA_TABLE) {
            Ok(table) => table,
            // No data table means no data yet
            Err(redb::TableError::TableDoesNotExist(_)) => {
                return Ok(vec![None; keys.len()]);
            }
            Err(e) => return Err(KvError::Backend(e.to_string())),
        };

        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(Self::read_one(&table, &self.scoped_key(key))?);
        }
        Ok(values)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.set_many(&[(key.to_string(), value.to_string())])
    }

    fn set_many(&self, entries: &[(String, String)]) -> KvResult<()> {
        let tx = self.db.begin_write().map_err(|e| KvError::Backend(e.to_string()))?;
        {
            let mut table =
                tx.open_table(DATA_TABLE).map_err(|e| KvError::Backend(e.to_string()))?;
            for (key, value) in entries {
                table
                    .insert(self.scoped_key(key).as_str(), value.as_str())
                    .map_err(|e| KvError::Backend(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| KvError::Backend(e.to_string()))
    }
}

fn validate_contract_id(contract_id: &str) -> KvResult<()> {
    if contract_id.is_empty() {
        return Err(KvError::Open("contract id must not be empty".to_string()));
    }
    if contract_id.contains(NAMESPACE_SEPARATOR) {
        return Err(KvError::Open("contract id must not contain NUL".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_roundtrip() {
        let kv = RedbKv::in_memory("test").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);

        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn batches_preserve_order() {
        let kv = RedbKv::in_memory("test").unwrap();
        kv.set_many(&[
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ])
        .unwrap();

        let values = kv
            .get_many(&["b".to_string(), "missing".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(values, vec![Some("2".to_string()), None, Some("1".to_string())]);
    }

    #[test]
    fn contracts_are_isolated() {
        let kv = RedbKv::in_memory("tenant-a").unwrap();
        kv.set("shared-key", "a-value").unwrap();

        let other = kv.contract("tenant-b").unwrap();
        assert_eq!(other.get("shared-key").unwrap(), None);

        other.set("shared-key", "b-value").unwrap();
        assert_eq!(kv.get("shared-key").unwrap(), Some("a-value".to_string()));
    }

    #[test]
    fn invalid_contract_ids_are_rejected() {
        assert!(RedbKv::in_memory("").is_err());
        assert!(RedbKv::in_memory("bad\u{0}id").is_err());
    }
}
