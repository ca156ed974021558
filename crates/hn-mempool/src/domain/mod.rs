//! Mempool domain: the pool itself.

pub mod pool;

pub use pool::{Mempool, DEFAULT_DRAIN_MAX};
