//! The cache's two pieces: the snapshot type and its holder.

pub mod cache;
pub mod entities;

pub use cache::BlockchainCache;
pub use entities::ChainTip;
