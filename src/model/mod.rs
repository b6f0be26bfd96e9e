//! Entity model for the planning knowledge base.
//!
//! Entities that are shared between aggregates — types, objects, fluents —
//! live behind `Rc<RefCell<_>>` handles so that renaming one through any
//! alias is visible through every other alias. The canonicalizing decode in
//! [`crate::dao`] restores exactly this sharing when aggregates are rebuilt
//! from storage.
//!
//! Equality is by name for [`Type`], [`Object`], [`Fluent`], and [`Action`];
//! [`Fact`] compares fluent and ordered objects (not value or goal flag);
//! [`ConditionEffect`] additionally compares value and time tag.

pub mod action;
pub mod condition_effect;
pub mod fact;
pub mod fluent;
pub mod typing;
pub mod validate;

pub use action::Action;
pub use condition_effect::{CeOperator, ConditionEffect, TimeTag};
pub use fact::{Fact, Number, Value};
pub use fluent::{Fluent, FluentHandle};
pub use typing::{Object, ObjectHandle, Type, TypeHandle};
pub use validate::{check_action, check_condition_effect, check_fact, father_chain, is_subtype};
