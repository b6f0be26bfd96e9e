//! Persistence backends for the knowledge base.
//!
//! Two interchangeable backends implement the [`Store`] trait:
//!
//! - [`MemStore`] — entities in concurrent hashmaps (DashMap), per process
//! - [`DurableStore`] — entities in ACID transactions (redb), on disk
//!
//! A store is a plain keyed byte-record container: one collection per
//! [`EntityKind`], records encoded by [`records`]. All domain behavior
//! (validation, dependency propagation, canonicalization) lives in the
//! DAO layer on top.

pub mod durable;
pub mod mem;
pub mod records;

pub use durable::DurableStore;
pub use mem::MemStore;

use crate::error::StoreResult;

/// The five persisted entity kinds, each with its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Type = 0,
    Object = 1,
    Fluent = 2,
    Fact = 3,
    Action = 4,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Type,
        EntityKind::Object,
        EntityKind::Fluent,
        EntityKind::Fact,
        EntityKind::Action,
    ];

    /// Collection (table) name for this kind.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Type => "type",
            EntityKind::Object => "object",
            EntityKind::Fluent => "fluent",
            EntityKind::Fact => "fact",
            EntityKind::Action => "action",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

/// Keyed byte-record storage, one collection per entity kind.
///
/// Keys are unique within a collection; `upsert` inserts or replaces.
/// `list` returns records in ascending key order so enumeration is
/// deterministic across backends.
pub trait Store: Send + Sync {
    /// Read a record. `Ok(None)` if the key is absent.
    fn get(&self, kind: EntityKind, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// All records of a kind, in ascending key order.
    fn list(&self, kind: EntityKind) -> StoreResult<Vec<(String, Vec<u8>)>>;

    /// Insert or replace a record.
    fn upsert(&self, kind: EntityKind, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Delete a record. Returns whether the key existed.
    fn delete(&self, kind: EntityKind, key: &str) -> StoreResult<bool>;

    /// Delete every record of a kind.
    fn delete_all(&self, kind: EntityKind) -> StoreResult<()>;

    /// Check whether a key exists.
    fn contains(&self, kind: EntityKind, key: &str) -> StoreResult<bool> {
        self.get(kind, key).map(|v| v.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collections_are_distinct() {
        let names: std::collections::HashSet<_> =
            EntityKind::ALL.iter().map(|k| k.collection()).collect();
        assert_eq!(names.len(), EntityKind::ALL.len());
    }

    #[test]
    fn kind_displays_as_collection_name() {
        assert_eq!(EntityKind::Fluent.to_string(), "fluent");
    }
}
