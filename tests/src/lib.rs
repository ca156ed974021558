//! # Black-Box End-to-End Scenarios
//!
//! One test per scenario seeded in the node's testable-properties
//! section: cold-start genesis, personal-feed-creation idempotence,
//! the duplicate-message race, a reaction update against an existing
//! nullifier, an atomic funds transfer, and the mempool drain-batch
//! boundary. Every scenario drives a real [`node_runtime::Node`]
//! through its RPC handlers and indexer, never a crate's internals
//! directly.

pub mod scenarios;
