//! Outbound ports the mempool drives.

pub mod outbound;

pub use outbound::IdempotencyTracker;
