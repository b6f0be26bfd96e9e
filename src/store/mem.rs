//! In-memory store backed by concurrent hashmaps.

use dashmap::DashMap;

use crate::error::StoreResult;
use crate::store::{EntityKind, Store};

/// Process-local store: one concurrent map per entity kind.
///
/// DashMap iteration order is arbitrary, so `list` sorts by key to
/// honor the [`Store`] ordering contract.
#[derive(Debug, Default)]
pub struct MemStore {
    collections: [DashMap<String, Vec<u8>>; 5],
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            collections: std::array::from_fn(|_| DashMap::new()),
        }
    }

    fn collection(&self, kind: EntityKind) -> &DashMap<String, Vec<u8>> {
        &self.collections[kind as usize]
    }
}

impl Store for MemStore {
    fn get(&self, kind: EntityKind, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.collection(kind).get(key).map(|v| v.value().clone()))
    }

    fn list(&self, kind: EntityKind) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let mut records: Vec<(String, Vec<u8>)> = self
            .collection(kind)
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        records.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(records)
    }

    fn upsert(&self, kind: EntityKind, key: &str, value: &[u8]) -> StoreResult<()> {
        self.collection(kind).insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, kind: EntityKind, key: &str) -> StoreResult<bool> {
        Ok(self.collection(kind).remove(key).is_some())
    }

    fn delete_all(&self, kind: EntityKind) -> StoreResult<()> {
        self.collection(kind).clear();
        Ok(())
    }
}
