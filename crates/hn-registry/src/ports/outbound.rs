//! Outbound ports: the trait boundaries `hn-validators` and
//! `hn-strategies` implement, and the registry dispatches to.

use async_trait::async_trait;
use hn_types::{BlockIndex, PayloadKind, SignedTransaction, ValidatedTransaction};

/// A content validator for one payload kind.
///
/// Implemented by `hn-validators`. Structural/signature validators and
/// the reaction ZK validator both implement this; the registry treats
/// them uniformly.
#[async_trait]
pub trait ContentValidator: Send + Sync {
    /// Whether this validator handles the given payload kind.
    fn can_validate(&self, kind: PayloadKind) -> bool;

    /// Validate a signed transaction and countersign it, or reject.
    ///
    /// # Errors
    ///
    /// Returns an error describing why validation failed; the caller
    /// (the mempool ingestion path) maps this to the external
    /// `RpcStatus` taxonomy.
    async fn validate_and_sign(
        &self,
        tx: &SignedTransaction,
    ) -> Result<ValidatedTransaction, hn_types::CoreError>;
}

/// An index strategy for one payload kind.
///
/// Implemented by `hn-strategies`. Invoked by the indexing dispatcher
/// (`hn-indexer`) once per transaction whose kind it declares it can
/// handle.
#[async_trait]
pub trait IndexStrategy: Send + Sync {
    /// Whether this strategy handles the given payload kind.
    fn can_handle(&self, kind: PayloadKind) -> bool;

    /// Apply this transaction's effects to persistent state.
    ///
    /// Strategies are idempotent on `(block_index, transaction_id)`: a
    /// replayed call must be a no-op, never a double-apply.
    ///
    /// # Errors
    ///
    /// Returns an error describing the failure; the indexing
    /// dispatcher logs it and continues with other strategies and
    /// transactions (partial success is acceptable per the indexing
    /// contract).
    async fn handle(
        &self,
        tx: &ValidatedTransaction,
        block_index: BlockIndex,
    ) -> Result<(), hn_types::CoreError>;
}
