//! Read-only and writable units of work.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use super::errors::PersistenceError;
use super::repositories::{
    BankRepository, BlockchainRepository, FeedsRepository, IdentityRepository,
    ReactionsRepository,
};
use super::store::InMemoryStore;
use super::view::{buffer_into_batch, View};

/// A snapshot read with no write capability and nothing to release
/// beyond the borrow itself.
pub struct ReadOnlyUnitOfWork {
    store: Arc<RwLock<InMemoryStore>>,
}

impl ReadOnlyUnitOfWork {
    pub(crate) fn new(store: Arc<RwLock<InMemoryStore>>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn blockchain(&self) -> BlockchainRepository<'_> {
        BlockchainRepository::new(View::ReadOnly(&self.store))
    }

    #[must_use]
    pub fn bank(&self) -> BankRepository<'_> {
        BankRepository::new(View::ReadOnly(&self.store))
    }

    #[must_use]
    pub fn identity(&self) -> IdentityRepository<'_> {
        IdentityRepository::new(View::ReadOnly(&self.store))
    }

    #[must_use]
    pub fn feeds(&self) -> FeedsRepository<'_> {
        FeedsRepository::new(View::ReadOnly(&self.store))
    }

    #[must_use]
    pub fn reactions(&self) -> ReactionsRepository<'_> {
        ReactionsRepository::new(View::ReadOnly(&self.store))
    }
}

/// A transactional unit of work.
///
/// Writes land in an in-memory buffer that shadows the shared store for
/// every read this same unit of work performs; nothing reaches the
/// store until [`commit`](Self::commit) applies the buffer as a single
/// atomic batch. Dropping without committing is a rollback — logged,
/// since an implicit rollback usually means a caller forgot to commit
/// rather than meant to discard the work.
pub struct WritableUnitOfWork {
    store: Arc<RwLock<InMemoryStore>>,
    buffer: RefCell<HashMap<Vec<u8>, Option<Vec<u8>>>>,
    finished: Cell<bool>,
}

impl WritableUnitOfWork {
    pub(crate) fn new(store: Arc<RwLock<InMemoryStore>>) -> Self {
        Self {
            store,
            buffer: RefCell::new(HashMap::new()),
            finished: Cell::new(false),
        }
    }

    #[must_use]
    pub fn blockchain(&self) -> BlockchainRepository<'_> {
        BlockchainRepository::new(View::Writable(&self.store, &self.buffer))
    }

    #[must_use]
    pub fn bank(&self) -> BankRepository<'_> {
        BankRepository::new(View::Writable(&self.store, &self.buffer))
    }

    #[must_use]
    pub fn identity(&self) -> IdentityRepository<'_> {
        IdentityRepository::new(View::Writable(&self.store, &self.buffer))
    }

    #[must_use]
    pub fn feeds(&self) -> FeedsRepository<'_> {
        FeedsRepository::new(View::Writable(&self.store, &self.buffer))
    }

    #[must_use]
    pub fn reactions(&self) -> ReactionsRepository<'_> {
        ReactionsRepository::new(View::Writable(&self.store, &self.buffer))
    }

    /// Apply every buffered write atomically and consume this unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::AlreadyFinished`] if this unit of
    /// work was already committed or rolled back.
    pub async fn commit(self) -> Result<(), PersistenceError> {
        if self.finished.get() {
            return Err(PersistenceError::AlreadyFinished);
        }
        let ops = buffer_into_batch(self.buffer.borrow_mut().drain().collect());
        self.store.write().atomic_batch_write(ops)?;
        self.finished.set(true);
        Ok(())
    }

    /// Discard every buffered write and consume this unit of work.
    pub async fn rollback(self) {
        self.finished.set(true);
    }
}

impl Drop for WritableUnitOfWork {
    fn drop(&mut self) {
        if !self.finished.get() && !self.buffer.borrow().is_empty() {
            warn!("writable unit of work dropped without commit or rollback; writes discarded");
        }
    }
}
