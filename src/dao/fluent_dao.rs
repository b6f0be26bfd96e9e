//! DAO for fluents.

use std::sync::Arc;

use crate::dao::{Canonicalizer, TypeDao};
use crate::error::KbResult;
use crate::model::{Fluent, FluentHandle};
use crate::store::records::{self, FluentRecord};
use crate::store::{EntityKind, Store};

/// Persistence for fluent signatures. Saving a fluent saves its declared
/// types first.
pub struct FluentDao {
    store: Arc<dyn Store>,
    types: TypeDao,
}

impl FluentDao {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let types = TypeDao::new(Arc::clone(&store));
        Self { store, types }
    }

    /// Load a fluent. `Ok(None)` if it is absent or any declared type
    /// cannot be loaded.
    ///
    /// A type name appearing at several argument positions resolves to one
    /// shared handle.
    pub fn get(&self, name: &str) -> KbResult<Option<FluentHandle>> {
        let Some(bytes) = self.store.get(EntityKind::Fluent, name)? else {
            return Ok(None);
        };
        let record: FluentRecord = records::decode(&bytes)?;

        let mut canon = Canonicalizer::new();
        let mut declared = Vec::with_capacity(record.types.len());
        for type_name in &record.types {
            let Some(ty) = self.types.get(type_name)? else {
                tracing::warn!(name, ty = %type_name, "discarding fluent with unresolvable type");
                return Ok(None);
            };
            match canon.intern_chain(&ty) {
                Ok(canonical) => declared.push(canonical),
                Err(_) => return Ok(None),
            }
        }
        Ok(Some(Fluent::new(record.name, declared, record.is_numeric)))
    }

    /// All stored fluents, in name order. Broken entries are skipped.
    pub fn get_all(&self) -> KbResult<Vec<FluentHandle>> {
        let mut fluents = Vec::new();
        for (name, _) in self.store.list(EntityKind::Fluent)? {
            if let Some(fluent) = self.get(&name)? {
                fluents.push(fluent);
            }
        }
        Ok(fluents)
    }

    /// Save a fluent, persisting its declared type chains first. Returns
    /// `Ok(false)` without writing the fluent if any chain is invalid.
    pub fn save(&self, fluent: &FluentHandle) -> KbResult<bool> {
        let declared = fluent.borrow().types.clone();
        for ty in &declared {
            if !self.types.save(ty)? {
                return Ok(false);
            }
        }

        let record = {
            let fluent = fluent.borrow();
            FluentRecord {
                name: fluent.name.clone(),
                types: fluent.types.iter().map(|t| t.borrow().name.clone()).collect(),
                is_numeric: fluent.is_numeric,
            }
        };
        let bytes = records::encode(&record)?;
        self.store.upsert(EntityKind::Fluent, &record.name, &bytes)?;
        tracing::debug!(name = %record.name, "saved fluent");
        Ok(true)
    }

    /// Delete a fluent. Returns whether it existed.
    pub fn delete(&self, fluent: &FluentHandle) -> KbResult<bool> {
        let name = fluent.borrow().name.clone();
        Ok(self.store.delete(EntityKind::Fluent, &name)?)
    }

    /// Delete every stored fluent.
    pub fn delete_all(&self) -> KbResult<()> {
        Ok(self.store.delete_all(EntityKind::Fluent)?)
    }
}
