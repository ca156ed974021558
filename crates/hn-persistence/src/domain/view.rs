//! The read/write view a unit of work hands its repositories.
//!
//! A [`WritableUnitOfWork`](super::unit_of_work::WritableUnitOfWork)
//! buffers writes in memory and only applies them to the shared store
//! on commit, so every repository it exposes reads its own
//! not-yet-committed writes (the buffer shadows the store) without
//! ever taking a write lock until commit time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};

use super::errors::PersistenceError;
use super::store::{BatchOperation, InMemoryStore, KeyValueStore};

pub(crate) enum View<'a> {
    ReadOnly(&'a Arc<RwLock<InMemoryStore>>),
    Writable(
        &'a Arc<RwLock<InMemoryStore>>,
        &'a RefCell<HashMap<Vec<u8>, Option<Vec<u8>>>>,
    ),
}

impl<'a> View<'a> {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, PersistenceError> {
        match self {
            View::ReadOnly(store) => store.read().get(key),
            View::Writable(store, buffer) => {
                if let Some(overlay) = buffer.borrow().get(key) {
                    return Ok(overlay.clone());
                }
                store.read().get(key)
            }
        }
    }

    fn put_raw(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), PersistenceError> {
        match self {
            View::ReadOnly(_) => Err(PersistenceError::ReadOnlyViolation),
            View::Writable(_, buffer) => {
                buffer.borrow_mut().insert(key, Some(value));
                Ok(())
            }
        }
    }

    fn delete_raw(&self, key: Vec<u8>) -> Result<(), PersistenceError> {
        match self {
            View::ReadOnly(_) => Err(PersistenceError::ReadOnlyViolation),
            View::Writable(_, buffer) => {
                buffer.borrow_mut().insert(key, None);
                Ok(())
            }
        }
    }

    fn prefix_scan_raw(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, PersistenceError> {
        match self {
            View::ReadOnly(store) => store.read().prefix_scan(prefix),
            View::Writable(store, buffer) => {
                let mut rows: HashMap<Vec<u8>, Vec<u8>> = store
                    .read()
                    .prefix_scan(prefix)?
                    .into_iter()
                    .collect();
                for (key, overlay) in buffer.borrow().iter() {
                    if !key.starts_with(prefix) {
                        continue;
                    }
                    match overlay {
                        Some(value) => {
                            rows.insert(key.clone(), value.clone());
                        }
                        None => {
                            rows.remove(key);
                        }
                    }
                }
                Ok(rows.into_iter().collect())
            }
        }
    }
}

/// Namespace-prefixed typed accessor built on top of a [`View`].
///
/// Each bounded-context repository wraps one of these rather than
/// talking to the store directly, so key-prefixing and JSON encoding
/// happen in exactly one place.
pub(crate) struct KvRepository<'a> {
    view: View<'a>,
    namespace: &'static str,
}

impl<'a> KvRepository<'a> {
    pub(crate) fn new(view: View<'a>, namespace: &'static str) -> Self {
        Self { view, namespace }
    }

    fn key(&self, suffix: &str) -> Vec<u8> {
        format!("{}:{}", self.namespace, suffix).into_bytes()
    }

    pub(crate) fn get<T: DeserializeOwned>(
        &self,
        suffix: &str,
    ) -> Result<Option<T>, PersistenceError> {
        match self.view.get_raw(&self.key(suffix))? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| PersistenceError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    pub(crate) fn put<T: Serialize>(&self, suffix: &str, value: &T) -> Result<(), PersistenceError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.view.put_raw(self.key(suffix), bytes)
    }

    pub(crate) fn delete(&self, suffix: &str) -> Result<(), PersistenceError> {
        self.view.delete_raw(self.key(suffix))
    }

    pub(crate) fn scan<T: DeserializeOwned>(
        &self,
        suffix_prefix: &str,
    ) -> Result<Vec<T>, PersistenceError> {
        let prefix = format!("{}:{}", self.namespace, suffix_prefix);
        let mut rows = self.view.prefix_scan_raw(prefix.as_bytes())?;
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows.into_iter()
            .map(|(_, bytes)| {
                serde_json::from_slice(&bytes)
                    .map_err(|e| PersistenceError::Serialization(e.to_string()))
            })
            .collect()
    }
}

/// Drain a write buffer into the atomic batch the store applies on commit.
pub(crate) fn buffer_into_batch(
    buffer: HashMap<Vec<u8>, Option<Vec<u8>>>,
) -> Vec<BatchOperation> {
    buffer
        .into_iter()
        .map(|(key, value)| match value {
            Some(value) => BatchOperation::Put { key, value },
            None => BatchOperation::Delete { key },
        })
        .collect()
}
