//! The persistence façade itself: the single entry point `node-runtime`
//! wires up and hands to every other component.

use std::sync::Arc;

use parking_lot::RwLock;

use super::store::InMemoryStore;
use super::unit_of_work::{ReadOnlyUnitOfWork, WritableUnitOfWork};

/// Owns the shared store and mints units of work over it.
#[derive(Clone)]
pub struct PersistenceFacade {
    store: Arc<RwLock<InMemoryStore>>,
}

impl PersistenceFacade {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(InMemoryStore::new())),
        }
    }

    #[must_use]
    pub fn create_read_only(&self) -> ReadOnlyUnitOfWork {
        ReadOnlyUnitOfWork::new(Arc::clone(&self.store))
    }

    #[must_use]
    pub fn create_writable(&self) -> WritableUnitOfWork {
        WritableUnitOfWork::new(Arc::clone(&self.store))
    }
}

impl Default for PersistenceFacade {
    fn default() -> Self {
        Self::new()
    }
}
