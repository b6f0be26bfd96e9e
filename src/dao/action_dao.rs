//! DAO for actions.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use crate::dao::{Canonicalizer, FluentDao, TypeDao};
use crate::error::KbResult;
use crate::model::{check_action, Action, ConditionEffect, Number, Object, ObjectHandle, Value};
use crate::store::records::{
    self, ActionRecord, ConditionEffectRecord, ParameterRecord,
};
use crate::store::{EntityKind, Store};

/// Persistence for actions.
///
/// Formal parameters are stored inline with the action, not in the object
/// collection. Saving an action saves its parameter types and condition/
/// effect fluents first; decoding rebuilds the shared-handle structure so
/// every condition and effect aliases the action's own parameters.
pub struct ActionDao {
    store: Arc<dyn Store>,
    types: TypeDao,
    fluents: FluentDao,
}

impl ActionDao {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let types = TypeDao::new(Arc::clone(&store));
        let fluents = FluentDao::new(Arc::clone(&store));
        Self {
            store,
            types,
            fluents,
        }
    }

    /// Load an action. `Ok(None)` if it is absent, references something
    /// unresolvable, or fails validation after decoding.
    pub fn get(&self, name: &str) -> KbResult<Option<Action>> {
        let Some(bytes) = self.store.get(EntityKind::Action, name)? else {
            return Ok(None);
        };
        let record: ActionRecord = records::decode(&bytes)?;
        self.decode(&record)
    }

    /// All stored actions, in name order. Broken entries are skipped.
    pub fn get_all(&self) -> KbResult<Vec<Action>> {
        let mut actions = Vec::new();
        for (name, _) in self.store.list(EntityKind::Action)? {
            if let Some(action) = self.get(&name)? {
                actions.push(action);
            }
        }
        Ok(actions)
    }

    /// Save an action, persisting its parameter types and the fluents of
    /// its conditions and effects first. Returns `Ok(false)` without
    /// writing the action if it fails validation or a dependency cannot be
    /// saved.
    pub fn save(&self, action: &Action) -> KbResult<bool> {
        if !check_action(action) {
            tracing::warn!(name = %action.name, "refusing to save invalid action");
            return Ok(false);
        }

        for parameter in &action.parameters {
            let ty = Rc::clone(&parameter.borrow().ty);
            if !self.types.save(&ty)? {
                return Ok(false);
            }
        }
        let mut saved_fluents = HashSet::new();
        for ce in action.conditions.iter().chain(&action.effects) {
            let fluent = Rc::clone(&ce.fact.fluent);
            if saved_fluents.insert(fluent.borrow().name.clone()) && !self.fluents.save(&fluent)? {
                return Ok(false);
            }
        }

        let record = self.encode(action);
        let bytes = records::encode(&record)?;
        self.store.upsert(EntityKind::Action, &record.name, &bytes)?;
        tracing::debug!(name = %record.name, "saved action");
        Ok(true)
    }

    /// Delete an action. Returns whether it existed.
    pub fn delete(&self, action: &Action) -> KbResult<bool> {
        Ok(self.store.delete(EntityKind::Action, &action.name)?)
    }

    /// Delete every stored action.
    pub fn delete_all(&self) -> KbResult<()> {
        Ok(self.store.delete_all(EntityKind::Action)?)
    }

    fn encode(&self, action: &Action) -> ActionRecord {
        ActionRecord {
            name: action.name.clone(),
            durative: action.durative,
            duration: action.duration,
            parameters: action
                .parameters
                .iter()
                .map(|p| {
                    let p = p.borrow();
                    ParameterRecord {
                        name: p.name.clone(),
                        ty: p.ty.borrow().name.clone(),
                    }
                })
                .collect(),
            conditions: action.conditions.iter().map(encode_ce).collect(),
            effects: action.effects.iter().map(encode_ce).collect(),
        }
    }

    fn decode(&self, record: &ActionRecord) -> KbResult<Option<Action>> {
        let mut parameters = Vec::with_capacity(record.parameters.len());
        let mut by_name: HashMap<String, ObjectHandle> = HashMap::new();
        for parameter in &record.parameters {
            let Some(ty) = self.types.get(&parameter.ty)? else {
                tracing::warn!(
                    name = %record.name,
                    ty = %parameter.ty,
                    "discarding action with unresolvable parameter type"
                );
                return Ok(None);
            };
            let obj = Object::new(&ty, parameter.name.clone());
            by_name.insert(parameter.name.clone(), Rc::clone(&obj));
            parameters.push(obj);
        }

        let mut conditions = Vec::with_capacity(record.conditions.len());
        for ce in &record.conditions {
            match self.decode_ce(ce, &by_name)? {
                Some(ce) => conditions.push(ce),
                None => return Ok(None),
            }
        }
        let mut effects = Vec::with_capacity(record.effects.len());
        for ce in &record.effects {
            match self.decode_ce(ce, &by_name)? {
                Some(ce) => effects.push(ce),
                None => return Ok(None),
            }
        }

        let mut action = Action {
            name: record.name.clone(),
            parameters,
            conditions,
            effects,
            durative: record.durative,
            duration: record.duration,
        };

        let mut canon = Canonicalizer::new();
        if canon.canonicalize_action(&mut action).is_err() {
            return Ok(None);
        }
        if !check_action(&action) {
            tracing::warn!(name = %record.name, "discarding stored action that fails validation");
            return Ok(None);
        }
        Ok(Some(action))
    }

    fn decode_ce(
        &self,
        record: &ConditionEffectRecord,
        parameters: &HashMap<String, ObjectHandle>,
    ) -> KbResult<Option<ConditionEffect>> {
        let Some(fluent) = self.fluents.get(&record.fluent)? else {
            return Ok(None);
        };

        let mut objects = Vec::with_capacity(record.parameters.len());
        for name in &record.parameters {
            let Some(obj) = parameters.get(name) else {
                return Ok(None);
            };
            objects.push(Rc::clone(obj));
        }

        let value = if fluent.borrow().is_numeric {
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

        let mut ce = ConditionEffect::new(&fluent, objects);
        ce.fact.value = value;
        ce.time = record.time;
        ce.op = record.op;
        Ok(Some(ce))
    }
}

fn encode_ce(ce: &ConditionEffect) -> ConditionEffectRecord {
    let (bool_value, numeric_value) = match ce.fact.value {
        Value::Bool(b) => (Some(b), None),
        Value::Num(n) => (None, Some(n.to_hundredths())),
    };
    ConditionEffectRecord {
        fluent: ce.fact.fluent.borrow().name.clone(),
        parameters: ce
            .fact
            .objects
            .iter()
            .map(|o| o.borrow().name.clone())
            .collect(),
        time: ce.time,
        op: ce.op,
        bool_value,
        numeric_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CeOperator, Fluent, TimeTag, Type};
    use crate::pddl::ToPddl;
    use crate::store::MemStore;

    fn dao() -> ActionDao {
        ActionDao::new(Arc::new(MemStore::new()))
    }

    fn navigation() -> Action {
        let robot_type = Type::new("robot");
        let wp_type = Type::new("wp");
        let robot_at = Fluent::predicate("robot_at", vec![robot_type.clone(), wp_type.clone()]);
        let battery_level = Fluent::function("battery_level", vec![robot_type.clone()]);

        let r = Object::new(&robot_type, "r");
        let s = Object::new(&wp_type, "s");
        let d = Object::new(&wp_type, "d");

        Action::new("navigation")
            .with_parameters(vec![r.clone(), s.clone(), d.clone()])
            .with_conditions(vec![
                ConditionEffect::new(&robot_at, vec![r.clone(), s.clone()]).at(TimeTag::AtStart),
                ConditionEffect::new(&battery_level, vec![r.clone()])
                    .with_op(CeOperator::Greater)
                    .with_value(30.0)
                    .at(TimeTag::AtStart),
            ])
            .with_effects(vec![
                ConditionEffect::new(&robot_at, vec![r.clone(), s.clone()])
                    .with_value(false)
                    .at(TimeTag::AtStart),
                ConditionEffect::new(&robot_at, vec![r.clone(), d.clone()]).at(TimeTag::AtEnd),
                ConditionEffect::new(&battery_level, vec![r.clone()])
                    .with_op(CeOperator::Decrease)
                    .with_value(10.0)
                    .at(TimeTag::AtEnd),
            ])
    }

    #[test]
    fn save_propagates_types_and_fluents() {
        let dao = dao();
        assert!(dao.save(&navigation()).unwrap());

        assert!(dao.types.get("robot").unwrap().is_some());
        assert!(dao.types.get("wp").unwrap().is_some());
        assert!(dao.fluents.get("robot_at").unwrap().is_some());
        assert!(dao.fluents.get("battery_level").unwrap().is_some());
    }

    #[test]
    fn loaded_action_validates_and_shares_parameters() {
        let dao = dao();
        dao.save(&navigation()).unwrap();

        let loaded = dao.get("navigation").unwrap().unwrap();
        assert!(check_action(&loaded));

        // Conditions alias the action's own parameter handles.
        let r = Rc::clone(&loaded.parameters[0]);
        assert!(Rc::ptr_eq(&r, &loaded.conditions[0].fact.objects[0]));
        assert!(Rc::ptr_eq(&r, &loaded.effects[2].fact.objects[0]));

        // Both fluents referencing "robot_at" collapsed to one handle.
        assert!(Rc::ptr_eq(
            &loaded.conditions[0].fact.fluent,
            &loaded.effects[0].fact.fluent
        ));
    }

    #[test]
    fn invalid_action_is_refused() {
        let dao = dao();
        let mut action = navigation();
        // A durative action with an untagged condition is invalid.
        action.conditions[0].time = None;
        assert!(!dao.save(&action).unwrap());
        assert!(dao.get("navigation").unwrap().is_none());
    }

    #[test]
    fn mismatched_effect_value_is_refused() {
        let dao = dao();
        let mut action = navigation();
        // A numeric value on the boolean robot_at effect.
        action.effects[1] = action.effects[1].clone().with_value(5.0);

        assert!(!dao.save(&action).unwrap());
        assert!(dao.get("navigation").unwrap().is_none());
    }

    #[test]
    fn numeric_values_round_trip_as_fixed_point() {
        let dao = dao();
        dao.save(&navigation()).unwrap();

        let loaded = dao.get("navigation").unwrap().unwrap();
        assert_eq!(
            loaded.conditions[1].to_pddl(),
            "(at start (> (battery_level ?r) 30.00))"
        );
    }

    #[test]
    fn action_with_deleted_fluent_is_discarded() {
        let dao = dao();
        dao.save(&navigation()).unwrap();
        let robot_at = dao.fluents.get("robot_at").unwrap().unwrap();
        dao.fluents.delete(&robot_at).unwrap();

        assert!(dao.get("navigation").unwrap().is_none());
        assert!(dao.get_all().unwrap().is_empty());
    }

    #[test]
    fn delete_and_delete_all() {
        let dao = dao();
        let action = navigation();
        dao.save(&action).unwrap();

        assert!(dao.delete(&action).unwrap());
        assert!(!dao.delete(&action).unwrap());

        dao.save(&action).unwrap();
        dao.delete_all().unwrap();
        assert!(dao.get_all().unwrap().is_empty());
    }
}
