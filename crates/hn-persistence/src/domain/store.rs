//! The key-value storage port and its in-memory adapter.
//!
//! A real deployment swaps `InMemoryStore` for a disk-backed
//! implementation of [`KeyValueStore`]; every bounded-context
//! repository is written against the trait, never the concrete type.

use std::collections::HashMap;

use super::errors::PersistenceError;

/// One write within an atomic batch.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Abstract key-value storage. All bounded-context repositories are
/// built on top of this single port, namespacing their own keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, PersistenceError>;

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, PersistenceError>;

    /// Apply every operation in `ops`, or none of them.
    fn atomic_batch_write(&mut self, ops: Vec<BatchOperation>) -> Result<(), PersistenceError>;
}

/// Single-process, non-durable [`KeyValueStore`].
///
/// Suitable for a single-node deployment and for tests; every write
/// this crate performs goes through `atomic_batch_write`, so swapping
/// in a durable store later only means replacing this type.
#[derive(Default)]
pub struct InMemoryStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.data.get(key).cloned())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, PersistenceError> {
        Ok(self
            .data
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn atomic_batch_write(&mut self, ops: Vec<BatchOperation>) -> Result<(), PersistenceError> {
        for op in ops {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_write_applies_puts_and_deletes() {
        let mut store = InMemoryStore::new();
        store
            .atomic_batch_write(vec![
                BatchOperation::Put {
                    key: b"a".to_vec(),
                    value: b"1".to_vec(),
                },
                BatchOperation::Put {
                    key: b"b".to_vec(),
                    value: b"2".to_vec(),
                },
            ])
            .unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));

        store
            .atomic_batch_write(vec![BatchOperation::Delete { key: b"a".to_vec() }])
            .unwrap();
        assert_eq!(store.get(b"a").unwrap(), None);
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn prefix_scan_filters_by_prefix() {
        let mut store = InMemoryStore::new();
        store
            .atomic_batch_write(vec![
                BatchOperation::Put {
                    key: b"block:1".to_vec(),
                    value: b"x".to_vec(),
                },
                BatchOperation::Put {
                    key: b"height:1".to_vec(),
                    value: b"y".to_vec(),
                },
            ])
            .unwrap();
        assert_eq!(store.prefix_scan(b"block:").unwrap().len(), 1);
    }
}
