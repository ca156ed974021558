//! Registry entries and the decoded-transaction sum type.

use std::sync::Arc;

use hn_types::PayloadKind;

use crate::ports::{ContentValidator, IndexStrategy};

/// Everything the registry knows about one payload kind.
#[derive(Clone)]
pub struct RegistryEntry {
    pub kind: PayloadKind,
    pub validator: Arc<dyn ContentValidator>,
    pub strategy: Arc<dyn IndexStrategy>,
}

impl RegistryEntry {
    #[must_use]
    pub fn new(
        kind: PayloadKind,
        validator: Arc<dyn ContentValidator>,
        strategy: Arc<dyn IndexStrategy>,
    ) -> Self {
        Self {
            kind,
            validator,
            strategy,
        }
    }
}

/// The result of polymorphic decoding: which envelope stage the raw
/// JSON carried, alongside its payload kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedTransaction {
    Signed(hn_types::SignedTransaction),
    Validated(hn_types::ValidatedTransaction),
}

impl DecodedTransaction {
    #[must_use]
    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            Self::Signed(tx) => tx.unsigned.payload_kind,
            Self::Validated(tx) => tx.payload_kind(),
        }
    }
}
