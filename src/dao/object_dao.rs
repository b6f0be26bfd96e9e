//! DAO for typed objects.

use std::rc::Rc;
use std::sync::Arc;

use crate::dao::TypeDao;
use crate::error::KbResult;
use crate::model::{Object, ObjectHandle};
use crate::store::records::{self, ObjectRecord};
use crate::store::{EntityKind, Store};

/// Persistence for objects. Saving an object saves its type first.
pub struct ObjectDao {
    store: Arc<dyn Store>,
    types: TypeDao,
}

impl ObjectDao {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let types = TypeDao::new(Arc::clone(&store));
        Self { store, types }
    }

    /// Load an object. `Ok(None)` if it is absent or its type cannot be
    /// loaded.
    pub fn get(&self, name: &str) -> KbResult<Option<ObjectHandle>> {
        let Some(bytes) = self.store.get(EntityKind::Object, name)? else {
            return Ok(None);
        };
        let record: ObjectRecord = records::decode(&bytes)?;
        let Some(ty) = self.types.get(&record.ty)? else {
            tracing::warn!(name, ty = %record.ty, "discarding object with unresolvable type");
            return Ok(None);
        };
        Ok(Some(Object::new(&ty, record.name)))
    }

    /// All stored objects, in name order. Broken entries are skipped.
    pub fn get_all(&self) -> KbResult<Vec<ObjectHandle>> {
        let mut objects = Vec::new();
        for (name, _) in self.store.list(EntityKind::Object)? {
            if let Some(obj) = self.get(&name)? {
                objects.push(obj);
            }
        }
        Ok(objects)
    }

    /// Save an object, persisting its type chain first. Returns
    /// `Ok(false)` without writing if the type chain is invalid.
    pub fn save(&self, obj: &ObjectHandle) -> KbResult<bool> {
        let ty = Rc::clone(&obj.borrow().ty);
        if !self.types.save(&ty)? {
            return Ok(false);
        }

        let record = {
            let obj = obj.borrow();
            ObjectRecord {
                name: obj.name.clone(),
                ty: obj.ty.borrow().name.clone(),
            }
        };
        let bytes = records::encode(&record)?;
        self.store.upsert(EntityKind::Object, &record.name, &bytes)?;
        tracing::debug!(name = %record.name, "saved object");
        Ok(true)
    }

    /// Delete an object. Returns whether it existed.
    pub fn delete(&self, obj: &ObjectHandle) -> KbResult<bool> {
        let name = obj.borrow().name.clone();
        Ok(self.store.delete(EntityKind::Object, &name)?)
    }

    /// Delete every stored object.
    pub fn delete_all(&self) -> KbResult<()> {
        Ok(self.store.delete_all(EntityKind::Object)?)
    }
}
