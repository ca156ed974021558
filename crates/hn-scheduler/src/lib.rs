//! # Block Production Scheduler
//!
//! A single-threaded cooperative tick loop: paused until
//! `BlockchainInitialized`, woken early by `TransactionReceived`,
//! otherwise driven by a fixed interval. Each tick drains the mempool
//! and, if non-empty, hands the batch to the block assembler.

pub mod domain;

pub use domain::{Scheduler, DEFAULT_TICK_INTERVAL};
