//! # Idempotency Gate
//!
//! Deduplicates `NewFeedMessage` submissions across two windows: an
//! in-flight set for transactions already accepted but not yet
//! committed, and the committed feed-message repository for everything
//! before that. [`IdempotencyGate`] also implements `hn-mempool`'s
//! [`hn_mempool::IdempotencyTracker`] port, so the mempool can free an
//! id the instant its transaction leaves the pool.

pub mod domain;

pub use domain::{CheckOutcome, IdempotencyGate};
