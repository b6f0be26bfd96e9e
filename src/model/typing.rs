//! Types and typed objects.
//!
//! A [`Type`] is a named node in a single-inheritance hierarchy: each type
//! has at most one `father`, and father chains terminate in a root type.
//! An [`Object`] is a named instance of exactly one type.
//!
//! Both are handed out as `Rc<RefCell<_>>` handles so that aggregates can
//! alias the same instance and see in-place edits through every alias.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared, mutable handle to a [`Type`].
pub type TypeHandle = Rc<RefCell<Type>>;

/// Shared, mutable handle to an [`Object`].
pub type ObjectHandle = Rc<RefCell<Object>>;

/// Named node in a single-inheritance type hierarchy.
///
/// Two types are equal iff their names are equal; the father is not part
/// of the identity.
#[derive(Debug, Clone)]
pub struct Type {
    pub name: String,
    pub father: Option<TypeHandle>,
}

impl Type {
    /// Create a root type with no father.
    pub fn new(name: impl Into<String>) -> TypeHandle {
        Rc::new(RefCell::new(Type {
            name: name.into(),
            father: None,
        }))
    }

    /// Create a type that inherits from `father`.
    pub fn with_father(name: impl Into<String>, father: &TypeHandle) -> TypeHandle {
        Rc::new(RefCell::new(Type {
            name: name.into(),
            father: Some(Rc::clone(father)),
        }))
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Type {}

/// A named instance of exactly one [`Type`].
///
/// Equality is by name only — the type is not part of the identity, which
/// is what allows changing an object's type in place after load.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub ty: TypeHandle,
}

impl Object {
    /// Create an object of the given type.
    pub fn new(ty: &TypeHandle, name: impl Into<String>) -> ObjectHandle {
        Rc::new(RefCell::new(Object {
            name: name.into(),
            ty: Rc::clone(ty),
        }))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Object {}
