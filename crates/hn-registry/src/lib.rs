//! # Transaction Registry
//!
//! Maps each [`hn_types::PayloadKind`] to the content validator and index
//! strategy that know how to handle it, and decodes raw transaction bytes
//! into the right envelope stage without the caller needing to guess
//! which one it's holding.
//!
//! `hn-validators` and `hn-strategies` implement the outbound ports in
//! [`ports`]; `node-runtime` wires one [`RegistryEntry`] per payload kind
//! at startup.

pub mod domain;
pub mod ports;

pub use domain::{DecodedTransaction, RegistryEntry, RegistryError, TransactionRegistry};
pub use ports::{ContentValidator, IndexStrategy};
