//! # Blockchain Cache
//!
//! A single process-wide [`BlockchainCache`] holding the chain tip:
//! last block index, previous/current/next block id, and whether any
//! chain state has ever been committed. Written only by the block
//! assembler under its commit lock; read freely by validators and RPC
//! handlers.

pub mod domain;

pub use domain::{BlockchainCache, ChainTip};
