//! Persistence domain: store port, views, repositories, units of work.

pub mod errors;
pub mod facade;
pub mod repositories;
pub mod store;
pub mod unit_of_work;
mod view;

pub use errors::PersistenceError;
pub use facade::PersistenceFacade;
pub use repositories::{
    BankRepository, BlockchainRepository, FeedsRepository, IdentityRepository,
    ReactionsRepository,
};
pub use store::{BatchOperation, InMemoryStore, KeyValueStore};
pub use unit_of_work::{ReadOnlyUnitOfWork, WritableUnitOfWork};
