//! Fluents: typed predicate and function signatures.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::typing::TypeHandle;

/// Shared, mutable handle to a [`Fluent`].
pub type FluentHandle = Rc<RefCell<Fluent>>;

/// A named, typed predicate or function signature.
///
/// `types` defines the arity and the required type of each argument by
/// position — order matters and is part of the signature. `is_numeric`
/// distinguishes PDDL functions (numeric-valued) from predicates
/// (boolean-valued). Equality is by name only.
#[derive(Debug, Clone)]
pub struct Fluent {
    pub name: String,
    pub types: Vec<TypeHandle>,
    pub is_numeric: bool,
}

impl Fluent {
    pub fn new(name: impl Into<String>, types: Vec<TypeHandle>, is_numeric: bool) -> FluentHandle {
        Rc::new(RefCell::new(Fluent {
            name: name.into(),
            types,
            is_numeric,
        }))
    }

    /// Boolean-valued fluent (a PDDL predicate).
    pub fn predicate(name: impl Into<String>, types: Vec<TypeHandle>) -> FluentHandle {
        Self::new(name, types, false)
    }

    /// Numeric-valued fluent (a PDDL function).
    pub fn function(name: impl Into<String>, types: Vec<TypeHandle>) -> FluentHandle {
        Self::new(name, types, true)
    }

    /// Arity of the fluent: how many arguments a ground fact must supply.
    pub fn arity(&self) -> usize {
        self.types.len()
    }
}

impl PartialEq for Fluent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Fluent {}
