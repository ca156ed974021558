//! Pure registry logic: entities, the registry itself, and its errors.

pub mod entities;
pub mod errors;
pub mod registry;

pub use entities::{DecodedTransaction, RegistryEntry};
pub use errors::RegistryError;
pub use registry::TransactionRegistry;
