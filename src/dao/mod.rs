//! Data access objects: persistence with validation and propagation.
//!
//! One DAO per entity kind, all sharing a [`Store`] backend through a
//! [`DaoFactory`]. Saves validate first and refuse invalid entities with
//! `Ok(false)`; they then persist the entity's dependencies before the
//! entity itself (an object's type before the object, a fact's objects and
//! fluent before the fact). Decodes re-link name references into shared
//! handles and silently discard structurally broken records.

pub mod action_dao;
pub mod canon;
pub mod fact_dao;
pub mod fluent_dao;
pub mod object_dao;
pub mod type_dao;

pub use action_dao::ActionDao;
pub use canon::Canonicalizer;
pub use fact_dao::FactDao;
pub use fluent_dao::FluentDao;
pub use object_dao::ObjectDao;
pub use type_dao::TypeDao;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::error::KbResult;
use crate::store::{DurableStore, MemStore, Store};

/// Which storage backend a [`DaoFactory`] opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local, non-persistent.
    #[default]
    Memory,
    /// redb database in the given data directory.
    Durable(PathBuf),
}

/// Storage configuration for a [`DaoFactory`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// In-memory storage (the default).
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
        }
    }

    /// Durable storage in the given data directory.
    pub fn durable(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackend::Durable(data_dir.into()),
        }
    }
}

/// Hands out DAOs bound to one shared store.
#[derive(Clone)]
pub struct DaoFactory {
    store: Arc<dyn Store>,
}

impl DaoFactory {
    /// Open the configured backend and build a factory on it.
    pub fn new(config: StorageConfig) -> KbResult<Self> {
        let store: Arc<dyn Store> = match &config.backend {
            StorageBackend::Memory => {
                tracing::info!("opening in-memory store");
                Arc::new(MemStore::new())
            }
            StorageBackend::Durable(data_dir) => {
                tracing::info!(data_dir = %data_dir.display(), "opening durable store");
                Arc::new(DurableStore::open(data_dir)?)
            }
        };
        Ok(Self { store })
    }

    /// Build a factory on an already-open store.
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn type_dao(&self) -> TypeDao {
        TypeDao::new(Arc::clone(&self.store))
    }

    pub fn object_dao(&self) -> ObjectDao {
        ObjectDao::new(Arc::clone(&self.store))
    }

    pub fn fluent_dao(&self) -> FluentDao {
        FluentDao::new(Arc::clone(&self.store))
    }

    pub fn fact_dao(&self) -> FactDao {
        FactDao::new(Arc::clone(&self.store))
    }

    pub fn action_dao(&self) -> ActionDao {
        ActionDao::new(Arc::clone(&self.store))
    }
}

impl std::fmt::Debug for DaoFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaoFactory").finish()
    }
}

// ---------------------------------------------------------------------------
// Process-wide factory
// ---------------------------------------------------------------------------

static GLOBAL: OnceLock<DaoFactory> = OnceLock::new();

/// Install the process-wide factory.
///
/// # Panics
///
/// Panics if a factory was already installed. Installing twice is a
/// programming error, not a recoverable condition.
pub fn init_global(factory: DaoFactory) {
    if GLOBAL.set(factory).is_err() {
        panic!("global DaoFactory already initialized");
    }
}

/// The process-wide factory installed by [`init_global`].
///
/// # Panics
///
/// Panics if [`init_global`] has not been called.
pub fn global() -> &'static DaoFactory {
    GLOBAL
        .get()
        .expect("global DaoFactory not initialized; call dao::init_global first")
}
