//! # Indexing Dispatcher
//!
//! Subscribes to `BlockCreated`, fans every transaction in the block out
//! to its registered index strategy concurrently, and publishes
//! `BlockIndexCompleted` once every strategy invocation has returned.
//! Individual strategy failures are logged, not propagated — indexing is
//! a best-effort, idempotent projection of an already-committed chain.

pub mod domain;

pub use domain::IndexingDispatcher;
