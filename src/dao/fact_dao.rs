//! DAO for ground facts.
//!
//! World facts and goal facts share one collection; the goal flag is part
//! of the storage key, so a fact and the goal asking for it coexist.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::dao::{Canonicalizer, FluentDao, ObjectDao};
use crate::error::KbResult;
use crate::model::{check_fact, Fact, Number, ObjectHandle, Value};
use crate::store::records::{self, FactRecord};
use crate::store::{EntityKind, Store};

/// Persistence for facts. Saving a fact validates it against its fluent's
/// signature and saves the referenced objects and fluent first.
pub struct FactDao {
    store: Arc<dyn Store>,
    objects: ObjectDao,
    fluents: FluentDao,
}

impl FactDao {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let objects = ObjectDao::new(Arc::clone(&store));
        let fluents = FluentDao::new(Arc::clone(&store));
        Self {
            store,
            objects,
            fluents,
        }
    }

    /// Load the stored fact with the same identity (fluent, objects, goal
    /// flag) as `fact`. `Ok(None)` if absent or broken.
    pub fn get(&self, fact: &Fact) -> KbResult<Option<Fact>> {
        let Some(bytes) = self.store.get(EntityKind::Fact, &fact.storage_key())? else {
            return Ok(None);
        };
        let record: FactRecord = records::decode(&bytes)?;
        self.decode(&record)
    }

    /// All stored facts, world and goal, in key order. Broken entries are
    /// skipped.
    pub fn get_all(&self) -> KbResult<Vec<Fact>> {
        let mut facts = Vec::new();
        for (_, bytes) in self.store.list(EntityKind::Fact)? {
            let record: FactRecord = records::decode(&bytes)?;
            if let Some(fact) = self.decode(&record)? {
                facts.push(fact);
            }
        }
        Ok(facts)
    }

    /// Stored goal facts only.
    pub fn get_goals(&self) -> KbResult<Vec<Fact>> {
        Ok(self.get_all()?.into_iter().filter(|f| f.is_goal).collect())
    }

    /// Stored world facts only.
    pub fn get_no_goals(&self) -> KbResult<Vec<Fact>> {
        Ok(self.get_all()?.into_iter().filter(|f| !f.is_goal).collect())
    }

    /// Stored facts of one fluent.
    pub fn get_by_fluent(&self, fluent_name: &str) -> KbResult<Vec<Fact>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|f| f.fluent.borrow().name == fluent_name)
            .collect())
    }

    /// Stored boolean (predicate) world facts, goals excluded.
    pub fn get_bool_facts(&self) -> KbResult<Vec<Fact>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|f| !f.is_goal && !f.fluent.borrow().is_numeric)
            .collect())
    }

    /// Stored numeric (function) world facts, goals excluded.
    pub fn get_numeric_facts(&self) -> KbResult<Vec<Fact>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|f| !f.is_goal && f.fluent.borrow().is_numeric)
            .collect())
    }

    /// Save a fact, persisting its objects and fluent first. Returns
    /// `Ok(false)` without writing if the fact fails signature validation
    /// or a dependency cannot be saved.
    pub fn save(&self, fact: &Fact) -> KbResult<bool> {
        if !check_fact(fact) {
            tracing::warn!(key = %fact.storage_key(), "refusing to save invalid fact");
            return Ok(false);
        }
        for obj in &fact.objects {
            if !self.objects.save(obj)? {
                return Ok(false);
            }
        }
        if !self.fluents.save(&fact.fluent)? {
            return Ok(false);
        }

        let record = self.encode(fact);
        let bytes = records::encode(&record)?;
        self.store
            .upsert(EntityKind::Fact, &fact.storage_key(), &bytes)?;
        tracing::debug!(key = %fact.storage_key(), "saved fact");
        Ok(true)
    }

    /// Delete a fact by identity. Returns whether it existed.
    pub fn delete(&self, fact: &Fact) -> KbResult<bool> {
        Ok(self.store.delete(EntityKind::Fact, &fact.storage_key())?)
    }

    /// Delete every stored fact, world and goal.
    pub fn delete_all(&self) -> KbResult<()> {
        Ok(self.store.delete_all(EntityKind::Fact)?)
    }

    fn encode(&self, fact: &Fact) -> FactRecord {
        let (bool_value, numeric_value) = match fact.value {
            Value::Bool(b) => (Some(b), None),
            Value::Num(n) => (None, Some(n.to_hundredths())),
        };
        FactRecord {
            fluent: fact.fluent.borrow().name.clone(),
            objects: fact
                .objects
                .iter()
                .map(|o| o.borrow().name.clone())
                .collect(),
            bool_value,
            numeric_value,
            is_goal: fact.is_goal,
        }
    }

    /// Rebuild a fact from its record, re-linking names into shared
    /// handles. `Ok(None)` discards any structurally broken record.
    fn decode(&self, record: &FactRecord) -> KbResult<Option<Fact>> {
        let Some(fluent) = self.fluents.get(&record.fluent)? else {
            return Ok(None);
        };

        // The fluent's declared types seed the canonical hierarchy; object
        // types then alias it.
        let mut canon = Canonicalizer::new();
        for ty in fluent.borrow().types.clone() {
            if canon.intern_chain(&ty).is_err() {
                return Ok(None);
            }
        }

        let mut loaded: HashMap<String, ObjectHandle> = HashMap::new();
        let mut objects = Vec::with_capacity(record.objects.len());
        for name in &record.objects {
            let obj = match loaded.get(name) {
                Some(obj) => Rc::clone(obj),
                None => {
                    let Some(obj) = self.objects.get(name)? else {
                        return Ok(None);
                    };
                    let ty = Rc::clone(&obj.borrow().ty);
                    match canon.intern_chain(&ty) {
                        Ok(canonical) => obj.borrow_mut().ty = canonical,
                        Err(_) => return Ok(None),
                    }
                    loaded.insert(name.clone(), Rc::clone(&obj));
                    obj
                }
            };
            objects.push(obj);
        }

        let mut fact = Fact::new(&fluent, objects);
        fact.is_goal = record.is_goal;
        fact.value = if fluent.borrow().is_numeric {
            match record.numeric_value {
                Some(raw) => Value::Num(Number::from_hundredths(raw)),
                None => return Ok(None),
            }
        } else {
            match record.bool_value {
                Some(b) => Value::Bool(b),
                None => return Ok(None),
            }
        };

        if !check_fact(&fact) {
            tracing::warn!(fluent = %record.fluent, "discarding stored fact that fails validation");
            return Ok(None);
        }
        Ok(Some(fact))
    }
}
