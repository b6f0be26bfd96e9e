//! ACID-durable store backed by redb.
//!
//! Each entity kind gets its own redb table, named after its collection.
//! All writes go through transactions; reads use MVCC snapshots. redb
//! iterates `&str` keys in ascending order, which directly satisfies the
//! [`Store`] ordering contract.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};

use crate::error::{StoreError, StoreResult};
use crate::store::{EntityKind, Store};

const DB_FILE: &str = "plankb.redb";

fn table_for(kind: EntityKind) -> TableDefinition<'static, &'static str, &'static [u8]> {
    TableDefinition::new(kind.collection())
}

/// On-disk store using redb.
pub struct DurableStore {
    db: Arc<Database>,
}

impl DurableStore {
    /// Open or create a durable store in the given directory.
    ///
    /// All entity tables are created up front so that reads on a fresh
    /// database never hit a missing table.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::Io { source: e })?;
        let db_path = data_dir.join(DB_FILE);
        let db = Database::create(&db_path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", db_path.display()),
        })?;

        let txn = db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        for kind in EntityKind::ALL {
            txn.open_table(table_for(kind)).map_err(|e| StoreError::Redb {
                message: format!("open_table {kind} failed: {e}"),
            })?;
        }
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl Store for DurableStore {
    fn get(&self, kind: EntityKind, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Redb {
            message: format!("begin_read failed: {e}"),
        })?;
        let table = txn.open_table(table_for(kind)).map_err(|e| StoreError::Redb {
            message: format!("open_table {kind} failed: {e}"),
        })?;
        let result = table.get(key).map_err(|e| StoreError::Redb {
            message: format!("get failed: {e}"),
        })?;
        Ok(result.map(|guard| guard.value().to_vec()))
    }

    fn list(&self, kind: EntityKind) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Redb {
            message: format!("begin_read failed: {e}"),
        })?;
        let table = txn.open_table(table_for(kind)).map_err(|e| StoreError::Redb {
            message: format!("open_table {kind} failed: {e}"),
        })?;
        let mut records = Vec::with_capacity(table.len().unwrap_or(0) as usize);
        for entry in table.iter().map_err(|e| StoreError::Redb {
            message: format!("iter failed: {e}"),
        })? {
            let (key, value) = entry.map_err(|e| StoreError::Redb {
                message: format!("iter entry failed: {e}"),
            })?;
            records.push((key.value().to_string(), value.value().to_vec()));
        }
        Ok(records)
    }

    fn upsert(&self, kind: EntityKind, key: &str, value: &[u8]) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        {
            let mut table = txn.open_table(table_for(kind)).map_err(|e| StoreError::Redb {
                message: format!("open_table {kind} failed: {e}"),
            })?;
            table.insert(key, value).map_err(|e| StoreError::Redb {
                message: format!("insert failed: {e}"),
            })?;
        }
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(())
    }

    fn delete(&self, kind: EntityKind, key: &str) -> StoreResult<bool> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        let existed = {
            let mut table = txn.open_table(table_for(kind)).map_err(|e| StoreError::Redb {
                message: format!("open_table {kind} failed: {e}"),
            })?;
            let result = table.remove(key).map_err(|e| StoreError::Redb {
                message: format!("remove failed: {e}"),
            })?;
            result.is_some()
        };
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(existed)
    }

    fn delete_all(&self, kind: EntityKind) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        txn.delete_table(table_for(kind)).map_err(|e| StoreError::Redb {
            message: format!("delete_table {kind} failed: {e}"),
        })?;
        // Recreate so later reads still find the table.
        txn.open_table(table_for(kind)).map_err(|e| StoreError::Redb {
            message: format!("open_table {kind} failed: {e}"),
        })?;
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(())
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn upsert_get_delete() {
        let dir = TempDir::new().unwrap();
        let store = DurableStore::open(dir.path()).unwrap();

        store.upsert(EntityKind::Type, "robot", b"r1").unwrap();
        assert_eq!(
            store.get(EntityKind::Type, "robot").unwrap(),
            Some(b"r1".to_vec())
        );

        assert!(store.delete(EntityKind::Type, "robot").unwrap());
        assert!(!store.delete(EntityKind::Type, "robot").unwrap());
        assert_eq!(store.get(EntityKind::Type, "robot").unwrap(), None);
    }

    #[test]
    fn fresh_database_lists_empty_collections() {
        let dir = TempDir::new().unwrap();
        let store = DurableStore::open(dir.path()).unwrap();
        for kind in EntityKind::ALL {
            assert!(store.list(kind).unwrap().is_empty());
        }
    }

    #[test]
    fn list_is_key_ordered() {
        let dir = TempDir::new().unwrap();
        let store = DurableStore::open(dir.path()).unwrap();
        for key in ["wp", "robot", "object"] {
            store.upsert(EntityKind::Type, key, b"x").unwrap();
        }
        let keys: Vec<String> = store
            .list(EntityKind::Type)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["object", "robot", "wp"]);
    }

    #[test]
    fn persistence_across_reopens() {
        let dir = TempDir::new().unwrap();
        {
            let store = DurableStore::open(dir.path()).unwrap();
            store.upsert(EntityKind::Fluent, "robot_at", b"f").unwrap();
        }
        let store = DurableStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get(EntityKind::Fluent, "robot_at").unwrap(),
            Some(b"f".to_vec())
        );
    }

    #[test]
    fn delete_all_leaves_other_collections() {
        let dir = TempDir::new().unwrap();
        let store = DurableStore::open(dir.path()).unwrap();
        store.upsert(EntityKind::Type, "robot", b"t").unwrap();
        store.upsert(EntityKind::Object, "rb1", b"o").unwrap();

        store.delete_all(EntityKind::Object).unwrap();
        assert!(store.list(EntityKind::Object).unwrap().is_empty());
        assert!(store.contains(EntityKind::Type, "robot").unwrap());
    }
}
