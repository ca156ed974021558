//! Port traits for the transaction registry.

pub mod outbound;

pub use outbound::{ContentValidator, IndexStrategy};
