//! # Mempool
//!
//! A concurrent bag of [`hn_types::ValidatedTransaction`]s awaiting the
//! next block. `add` never blocks; `drain` hands a batch to the block
//! assembler and, for any drained feed messages, releases their ids from
//! the idempotency gate's in-flight set in the same call — see
//! [`ports::IdempotencyTracker`].

pub mod domain;
pub mod ports;

pub use domain::{Mempool, DEFAULT_DRAIN_MAX};
pub use ports::IdempotencyTracker;
