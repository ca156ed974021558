//! # Persistence Façade
//!
//! One [`PersistenceFacade`] per node, minting per-call
//! [`ReadOnlyUnitOfWork`]/[`WritableUnitOfWork`] instances over five
//! bounded-context repositories (blockchain, bank, identity, feeds,
//! reactions). Writable units of work buffer every write in memory and
//! apply it as a single atomic batch on [`WritableUnitOfWork::commit`],
//! so the block-and-state commit in `hn-block-assembler` is one
//! transaction spanning the block row and the chain-state upsert.

pub mod domain;

pub use domain::{
    BankRepository, BatchOperation, BlockchainRepository, FeedsRepository, IdentityRepository,
    InMemoryStore, KeyValueStore, PersistenceError, PersistenceFacade, ReactionsRepository,
    ReadOnlyUnitOfWork, WritableUnitOfWork,
};
