//! DAO for types.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::KbResult;
use crate::model::{father_chain, Type, TypeHandle};
use crate::store::records::{self, TypeRecord};
use crate::store::{EntityKind, Store};

/// Persistence for the type hierarchy.
///
/// Saving a type saves its whole father chain, root first, so a stored
/// type's father is always itself stored. Deleting a type also deletes its
/// direct children, whose father link would otherwise dangle.
pub struct TypeDao {
    store: Arc<dyn Store>,
}

impl TypeDao {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Load a type and its full father chain. `Ok(None)` if the type is
    /// absent, or if its stored chain is broken (missing father, cycle).
    pub fn get(&self, name: &str) -> KbResult<Option<TypeHandle>> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut current = Some(name.to_string());

        while let Some(type_name) = current {
            if !seen.insert(type_name.clone()) {
                tracing::warn!(name, "discarding type with cyclic stored chain");
                return Ok(None);
            }
            let Some(bytes) = self.store.get(EntityKind::Type, &type_name)? else {
                if !chain.is_empty() {
                    tracing::warn!(name, father = %type_name, "discarding type with missing father");
                }
                return Ok(None);
            };
            let record: TypeRecord = records::decode(&bytes)?;
            current = record.father.clone();
            chain.push(record);
        }

        // Rebuild root first so every node links to an already-built father.
        let mut handle: Option<TypeHandle> = None;
        for record in chain.into_iter().rev() {
            handle = Some(match &handle {
                Some(father) => Type::with_father(record.name, father),
                None => Type::new(record.name),
            });
        }
        Ok(handle)
    }

    /// All stored types, in name order. Broken entries are skipped.
    pub fn get_all(&self) -> KbResult<Vec<TypeHandle>> {
        let mut types = Vec::new();
        for (name, _) in self.store.list(EntityKind::Type)? {
            if let Some(ty) = self.get(&name)? {
                types.push(ty);
            }
        }
        Ok(types)
    }

    /// Save a type and its father chain. Returns `Ok(false)` without
    /// writing if the chain is cyclic.
    pub fn save(&self, ty: &TypeHandle) -> KbResult<bool> {
        let chain = match father_chain(ty) {
            Ok(chain) => chain,
            Err(err) => {
                tracing::warn!(%err, "refusing to save type");
                return Ok(false);
            }
        };

        for node in chain.iter().rev() {
            let node = node.borrow();
            let record = TypeRecord {
                name: node.name.clone(),
                father: node.father.as_ref().map(|f| f.borrow().name.clone()),
            };
            let bytes = records::encode(&record)?;
            self.store.upsert(EntityKind::Type, &record.name, &bytes)?;
        }
        tracing::debug!(name = %ty.borrow().name, "saved type chain");
        Ok(true)
    }

    /// Delete a type and its direct children. Returns whether the type
    /// itself existed.
    pub fn delete(&self, ty: &TypeHandle) -> KbResult<bool> {
        let name = ty.borrow().name.clone();
        if !self.store.contains(EntityKind::Type, &name)? {
            return Ok(false);
        }

        for (key, bytes) in self.store.list(EntityKind::Type)? {
            let Ok(record) = records::decode::<TypeRecord>(&bytes) else {
                continue;
            };
            if record.father.as_deref() == Some(name.as_str()) {
                self.store.delete(EntityKind::Type, &key)?;
            }
        }
        Ok(self.store.delete(EntityKind::Type, &name)?)
    }

    /// Delete every stored type.
    pub fn delete_all(&self) -> KbResult<()> {
        Ok(self.store.delete_all(EntityKind::Type)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn dao() -> TypeDao {
        TypeDao::new(Arc::new(MemStore::new()))
    }

    #[test]
    fn save_and_get_round_trips_the_chain() {
        let dao = dao();
        let object = Type::new("object");
        let robot = Type::with_father("robot", &object);
        assert!(dao.save(&robot).unwrap());

        // The father was stored too.
        assert!(dao.get("object").unwrap().is_some());

        let loaded = dao.get("robot").unwrap().unwrap();
        let loaded = loaded.borrow();
        assert_eq!(loaded.name, "robot");
        assert_eq!(
            loaded.father.as_ref().unwrap().borrow().name,
            "object"
        );
    }

    #[test]
    fn get_missing_returns_none() {
        assert!(dao().get("robot").unwrap().is_none());
    }

    #[test]
    fn save_is_idempotent() {
        let dao = dao();
        let robot = Type::new("robot");
        assert!(dao.save(&robot).unwrap());
        assert!(dao.save(&robot).unwrap());
        assert_eq!(dao.get_all().unwrap().len(), 1);
    }

    #[test]
    fn cyclic_chain_is_refused() {
        let dao = dao();
        let a = Type::new("a");
        let b = Type::with_father("b", &a);
        a.borrow_mut().father = Some(std::rc::Rc::clone(&b));
        assert!(!dao.save(&a).unwrap());
        assert!(dao.get("a").unwrap().is_none());
    }

    #[test]
    fn broken_stored_chain_is_discarded() {
        let dao = dao();
        let bytes = records::encode(&TypeRecord {
            name: "robot".into(),
            father: Some("object".into()),
        })
        .unwrap();
        dao.store
            .upsert(EntityKind::Type, "robot", &bytes)
            .unwrap();

        assert!(dao.get("robot").unwrap().is_none());
        assert!(dao.get_all().unwrap().is_empty());
    }

    #[test]
    fn delete_cascades_to_direct_children() {
        let dao = dao();
        let object = Type::new("object");
        let robot = Type::with_father("robot", &object);
        let wp = Type::with_father("wp", &object);
        dao.save(&robot).unwrap();
        dao.save(&wp).unwrap();

        assert!(dao.delete(&object).unwrap());
        assert!(dao.get("object").unwrap().is_none());
        assert!(dao.get("robot").unwrap().is_none());
        assert!(dao.get("wp").unwrap().is_none());
    }

    #[test]
    fn delete_missing_returns_false() {
        let dao = dao();
        assert!(!dao.delete(&Type::new("robot")).unwrap());
    }

    #[test]
    fn get_all_is_name_ordered() {
        let dao = dao();
        dao.save(&Type::new("wp")).unwrap();
        dao.save(&Type::new("robot")).unwrap();
        let names: Vec<String> = dao
            .get_all()
            .unwrap()
            .iter()
            .map(|t| t.borrow().name.clone())
            .collect();
        assert_eq!(names, ["robot", "wp"]);
    }
}
