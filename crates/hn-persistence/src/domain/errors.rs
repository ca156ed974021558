//! Persistence errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("row failed to (de)serialize: {0}")]
    Serialization(String),

    #[error("attempted to write through a read-only unit of work")]
    ReadOnlyViolation,

    #[error("unit of work already committed or rolled back")]
    AlreadyFinished,

    #[error("underlying store unavailable: {0}")]
    StoreUnavailable(String),
}
