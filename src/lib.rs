//! # plankb
//!
//! A typed knowledge base for PDDL-style planning domains. Models type
//! hierarchies, typed objects, fluents, ground facts, and parameterized
//! actions, validates them against their signatures, persists them to a
//! document store, and renders them to PDDL text.
//!
//! ## Architecture
//!
//! - **Entity model** (`model`): shared-handle value types with positional
//!   signature validation and a single-inheritance type hierarchy
//! - **PDDL rendering** (`pddl`): deterministic text serialization, also
//!   used as the canonical form in tests
//! - **Storage** (`store`): one collection per entity kind, in-memory
//!   (DashMap) or durable (redb)
//! - **Persistence** (`dao`): per-kind DAOs with dependency-ordered save
//!   propagation and canonicalizing decode
//!
//! ## Library usage
//!
//! ```no_run
//! use plankb::dao::{DaoFactory, StorageConfig};
//! use plankb::model::{Fact, Fluent, Object, Type};
//! use plankb::pddl::ToPddl;
//!
//! let factory = DaoFactory::new(StorageConfig::default()).unwrap();
//! let robot = Type::new("robot");
//! let rb1 = Object::new(&robot, "rb1");
//! let battery = Fluent::function("battery_level", vec![robot.clone()]);
//! let fact = Fact::new(&battery, vec![rb1]).with_value(100.0);
//! assert_eq!(fact.to_pddl(), "(= (battery_level rb1) 100)");
//! factory.fact_dao().save(&fact).unwrap();
//! ```

pub mod dao;
pub mod error;
pub mod model;
pub mod pddl;
pub mod store;
