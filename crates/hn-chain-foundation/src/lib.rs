//! # Chain Foundation
//!
//! The node's startup sequence: find existing chain state, or build
//! genesis if there is none, then publish `BlockchainInitialized` to
//! unblock the scheduler.

pub mod domain;

pub use domain::ChainFoundation;
