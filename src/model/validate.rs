//! Type-hierarchy checks and structural signature validation.
//!
//! Validation never mutates and never raises for domain violations: every
//! check returns a plain `bool` so callers (the DAOs) can refuse a save or
//! discard a decoded entity. A single failing condition or effect fails
//! its whole action — validation is all-or-nothing.

use std::collections::HashSet;
use std::rc::Rc;

use crate::error::ModelError;
use crate::model::action::Action;
use crate::model::condition_effect::ConditionEffect;
use crate::model::fact::{Fact, Value};
use crate::model::typing::{ObjectHandle, TypeHandle};

/// Check whether `candidate` is `target` or a transitive subtype of it.
///
/// Walks the father chain from `candidate`. The walk keeps a visited set,
/// so a corrupted cyclic chain terminates with `false` instead of looping.
pub fn is_subtype(candidate: &TypeHandle, target: &TypeHandle) -> bool {
    let target_name = target.borrow().name.clone();
    let mut seen = HashSet::new();
    let mut current = Some(Rc::clone(candidate));

    while let Some(ty) = current {
        let (name, father) = {
            let t = ty.borrow();
            (t.name.clone(), t.father.clone())
        };
        if name == target_name {
            return true;
        }
        if !seen.insert(name) {
            return false;
        }
        current = father;
    }

    false
}

/// Materialize the father chain of a type, starting with the type itself.
///
/// Fails if the chain revisits a type name — cyclic hierarchies are
/// rejected rather than treated as undefined behavior.
pub fn father_chain(ty: &TypeHandle) -> Result<Vec<TypeHandle>, ModelError> {
    let mut seen = HashSet::new();
    let mut chain = Vec::new();
    let mut current = Some(Rc::clone(ty));

    while let Some(node) = current {
        let (name, father) = {
            let t = node.borrow();
            (t.name.clone(), t.father.clone())
        };
        if !seen.insert(name.clone()) {
            return Err(ModelError::CyclicTypeHierarchy { type_name: name });
        }
        chain.push(node);
        current = father;
    }

    Ok(chain)
}

fn value_matches(is_numeric: bool, value: Value) -> bool {
    match value {
        Value::Bool(_) => !is_numeric,
        Value::Num(_) => is_numeric,
    }
}

/// Check a fact against its fluent's signature: the object count must
/// match the declared arity, each object's type must be the declared
/// type at that position or a subtype of it, and the value kind must
/// match the fluent's kind (boolean for predicates, numeric for
/// functions).
pub fn check_fact(fact: &Fact) -> bool {
    let fluent = fact.fluent.borrow();

    if fact.objects.len() != fluent.types.len() {
        return false;
    }
    if !value_matches(fluent.is_numeric, fact.value) {
        return false;
    }

    for (obj, expected) in fact.objects.iter().zip(&fluent.types) {
        let actual = Rc::clone(&obj.borrow().ty);
        if !is_subtype(&actual, expected) {
            return false;
        }
    }

    true
}

/// Check a condition/effect against its fluent's signature and an action's
/// parameter list: signature rules as for facts, plus every object must be
/// one of the given parameters (by object equality, i.e. by name).
pub fn check_condition_effect(ce: &ConditionEffect, parameters: &[ObjectHandle]) -> bool {
    let fluent = ce.fact.fluent.borrow();

    if ce.fact.objects.len() != fluent.types.len() {
        return false;
    }
    if !value_matches(fluent.is_numeric, ce.fact.value) {
        return false;
    }

    for (obj, expected) in ce.fact.objects.iter().zip(&fluent.types) {
        if !parameters.iter().any(|p| *p.borrow() == *obj.borrow()) {
            return false;
        }
        let actual = Rc::clone(&obj.borrow().ty);
        if !is_subtype(&actual, expected) {
            return false;
        }
    }

    true
}

/// Check a whole action: every condition and effect must match the
/// action's durative flag (time tag present iff durative) and pass
/// [`check_condition_effect`] against the action's parameters.
pub fn check_action(action: &Action) -> bool {
    for ce in action.conditions.iter().chain(&action.effects) {
        if action.durative != ce.time.is_some() {
            return false;
        }
        if !check_condition_effect(ce, &action.parameters) {
            return false;
        }
    }

    true
}
