//! Handle canonicalization for decoded aggregates.
//!
//! Decoding re-creates a fresh handle for every name reference, so an
//! aggregate rebuilt from storage would hold several copies of the same
//! type or fluent. A [`Canonicalizer`] merges them: the first handle seen
//! for a name becomes canonical, and later handles with the same name are
//! replaced by it. After canonicalization, editing an entity through any
//! alias is visible through every other alias, exactly as when the
//! aggregate was first built in memory.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ModelError;
use crate::model::{father_chain, Action, FluentHandle, TypeHandle};

/// Per-decode interning table for types and fluents.
///
/// First occurrence wins: interning a name that is already registered
/// returns the registered handle and ignores the new one's contents.
#[derive(Debug, Default)]
pub struct Canonicalizer {
    types: HashMap<String, TypeHandle>,
    fluents: HashMap<String, FluentHandle>,
}

impl Canonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical handle for a type, registering its whole father chain.
    ///
    /// Newly registered nodes get their father re-linked to the canonical
    /// father, so the shared hierarchy has one handle per type name all the
    /// way to the root. Fails on a cyclic chain.
    pub fn intern_chain(&mut self, ty: &TypeHandle) -> Result<TypeHandle, ModelError> {
        let chain = father_chain(ty)?;

        let mut canonical = Rc::clone(ty);
        let mut father: Option<TypeHandle> = None;
        for node in chain.iter().rev() {
            let name = node.borrow().name.clone();
            canonical = match self.types.get(&name) {
                Some(existing) => Rc::clone(existing),
                None => {
                    node.borrow_mut().father = father.clone();
                    self.types.insert(name, Rc::clone(node));
                    Rc::clone(node)
                }
            };
            father = Some(Rc::clone(&canonical));
        }
        Ok(canonical)
    }

    /// Canonical handle for a fluent.
    ///
    /// The first occurrence also canonicalizes the fluent's declared types
    /// in place, so signature types alias the shared hierarchy.
    pub fn intern_fluent(&mut self, fluent: &FluentHandle) -> Result<FluentHandle, ModelError> {
        let name = fluent.borrow().name.clone();
        if let Some(existing) = self.fluents.get(&name) {
            return Ok(Rc::clone(existing));
        }

        let declared = fluent.borrow().types.clone();
        let mut canonical_types = Vec::with_capacity(declared.len());
        for ty in &declared {
            canonical_types.push(self.intern_chain(ty)?);
        }
        fluent.borrow_mut().types = canonical_types;

        self.fluents.insert(name, Rc::clone(fluent));
        Ok(Rc::clone(fluent))
    }

    /// Merge duplicated handles across a whole decoded action: condition
    /// fluents, then effect fluents, then parameter types.
    pub fn canonicalize_action(&mut self, action: &mut Action) -> Result<(), ModelError> {
        for ce in action
            .conditions
            .iter_mut()
            .chain(action.effects.iter_mut())
        {
            let fluent = Rc::clone(&ce.fact.fluent);
            ce.fact.fluent = self.intern_fluent(&fluent)?;
        }
        for parameter in &action.parameters {
            let ty = Rc::clone(&parameter.borrow().ty);
            let canonical = self.intern_chain(&ty)?;
            parameter.borrow_mut().ty = canonical;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConditionEffect, Fluent, Object, Type};

    #[test]
    fn first_occurrence_wins() {
        let mut canon = Canonicalizer::new();
        let a = Type::new("robot");
        let b = Type::new("robot");

        let first = canon.intern_chain(&a).unwrap();
        let second = canon.intern_chain(&b).unwrap();
        assert!(Rc::ptr_eq(&first, &a));
        assert!(Rc::ptr_eq(&second, &a));
        assert!(!Rc::ptr_eq(&second, &b));
    }

    #[test]
    fn chain_interning_relinks_fathers() {
        let mut canon = Canonicalizer::new();

        // Two independent decodes of the same two-level hierarchy.
        let object1 = Type::new("object");
        let robot1 = Type::with_father("robot", &object1);
        let object2 = Type::new("object");
        let robot2 = Type::with_father("robot", &object2);

        let first = canon.intern_chain(&robot1).unwrap();
        let second = canon.intern_chain(&robot2).unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        // The canonical robot's father is the canonical object.
        let father = first.borrow().father.clone().unwrap();
        assert!(Rc::ptr_eq(&father, &object1));
    }

    #[test]
    fn chain_interning_rejects_cycles() {
        let mut canon = Canonicalizer::new();
        let a = Type::new("a");
        let b = Type::with_father("b", &a);
        a.borrow_mut().father = Some(Rc::clone(&b));
        assert!(canon.intern_chain(&a).is_err());
    }

    #[test]
    fn fluent_interning_canonicalizes_declared_types() {
        let mut canon = Canonicalizer::new();
        let robot1 = Type::new("robot");
        let robot2 = Type::new("robot");

        let seeded = canon.intern_chain(&robot1).unwrap();
        let fluent = Fluent::predicate("at_base", vec![robot2]);
        canon.intern_fluent(&fluent).unwrap();

        assert!(Rc::ptr_eq(&fluent.borrow().types[0], &seeded));
    }

    #[test]
    fn action_canonicalization_shares_fluents_and_types() {
        let mut canon = Canonicalizer::new();

        // Each condition/effect decoded its own copy of the fluent, and the
        // parameter its own copy of the type.
        let robot_c = Type::new("robot");
        let robot_e = Type::new("robot");
        let robot_p = Type::new("robot");
        let fluent_c = Fluent::predicate("at_base", vec![robot_c]);
        let fluent_e = Fluent::predicate("at_base", vec![robot_e]);
        let r = Object::new(&robot_p, "r");

        let mut action = crate::model::Action::new("dock")
            .with_parameters(vec![Rc::clone(&r)])
            .with_conditions(vec![ConditionEffect::new(&fluent_c, vec![Rc::clone(&r)])])
            .with_effects(vec![ConditionEffect::new(&fluent_e, vec![Rc::clone(&r)])]);
        canon.canonicalize_action(&mut action).unwrap();

        let cond_fluent = Rc::clone(&action.conditions[0].fact.fluent);
        let eff_fluent = Rc::clone(&action.effects[0].fact.fluent);
        assert!(Rc::ptr_eq(&cond_fluent, &eff_fluent));

        // The parameter's type now aliases the fluent's declared type.
        let declared = Rc::clone(&cond_fluent.borrow().types[0]);
        assert!(Rc::ptr_eq(&r.borrow().ty, &declared));
    }
}
