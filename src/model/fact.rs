//! Ground facts and fact values.
//!
//! A [`Fact`] instantiates a [`Fluent`](crate::model::Fluent) with concrete
//! objects and a value. Boolean fluents default to `true`, numeric fluents
//! to `0`. Facts flagged as goals live in the same collection as world
//! facts but are kept distinct by their storage key.

use std::rc::Rc;

use crate::model::fluent::FluentHandle;
use crate::model::typing::ObjectHandle;

/// A numeric fact value.
///
/// The two variants differ only in rendering: `Plain` is a freshly
/// constructed value and renders with `f64`'s default formatting (`100.0`
/// renders as `100`), while `Fixed` came out of storage — which keeps
/// hundredths — and renders with exactly two decimals (`100.00`).
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Plain(f64),
    Fixed(f64),
}

impl Number {
    /// The numeric value regardless of rendering variant.
    pub fn value(self) -> f64 {
        match self {
            Number::Plain(v) | Number::Fixed(v) => v,
        }
    }

    /// Rebuild a stored value from scaled hundredths.
    pub fn from_hundredths(raw: i64) -> Self {
        Number::Fixed(raw as f64 / 100.0)
    }

    /// Scale to hundredths for storage.
    pub fn to_hundredths(self) -> i64 {
        (self.value() * 100.0).round() as i64
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Plain(v) => write!(f, "{v}"),
            Number::Fixed(v) => write!(f, "{v:.2}"),
        }
    }
}

/// The value of a fact: boolean for predicates, numeric for functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Num(Number),
}

impl Value {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b),
            Value::Num(_) => None,
        }
    }

    pub fn as_number(self) -> Option<Number> {
        match self {
            Value::Num(n) => Some(n),
            Value::Bool(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Num(Number::Plain(v))
    }
}

/// A ground instantiation of a fluent with concrete objects and a value.
///
/// Equality compares the fluent and the ordered object list; `value` and
/// `is_goal` are not part of the identity.
#[derive(Debug, Clone)]
pub struct Fact {
    pub fluent: FluentHandle,
    pub objects: Vec<ObjectHandle>,
    pub value: Value,
    pub is_goal: bool,
}

impl Fact {
    /// Create a fact with the type-appropriate default value
    /// (`true` for predicates, `0` for functions).
    pub fn new(fluent: &FluentHandle, objects: Vec<ObjectHandle>) -> Self {
        let value = if fluent.borrow().is_numeric {
            Value::Num(Number::Plain(0.0))
        } else {
            Value::Bool(true)
        };
        Fact {
            fluent: Rc::clone(fluent),
            objects,
            value,
            is_goal: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Mark this fact as a goal fact.
    pub fn as_goal(mut self) -> Self {
        self.is_goal = true;
        self
    }

    /// Derived primary key for storage: fact identity is the fluent, the
    /// ordered object names, and the goal flag.
    pub fn storage_key(&self) -> String {
        let mut parts = vec![self.fluent.borrow().name.clone()];
        for obj in &self.objects {
            parts.push(obj.borrow().name.clone());
        }
        format!("{} goal={}", parts.join(" "), self.is_goal)
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        if *self.fluent.borrow() != *other.fluent.borrow() {
            return false;
        }
        if self.objects.len() != other.objects.len() {
            return false;
        }
        self.objects
            .iter()
            .zip(&other.objects)
            .all(|(a, b)| *a.borrow() == *b.borrow())
    }
}
