//! The externally-observable failure taxonomy (spec §7).
//!
//! No component surfaces a raw exception across a boundary. Everything
//! that can fail maps to one of these kinds before it crosses into an
//! RPC response or a log line an operator is expected to act on.

use thiserror::Error;

/// A failure classified by where it originated and how it recovers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed input at an RPC boundary (wrong byte lengths, etc).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transaction registry saw a `PayloadKind` it has no entry for.
    #[error("unknown payload kind: {0}")]
    UnknownPayloadKind(String),

    /// A content validator rejected a transaction.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// The idempotency gate reports this message id is already tracked.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The block assembler's commit failed; the cache advance was rolled back.
    #[error("assembly conflict: {0}")]
    AssemblyConflict(String),

    /// An index strategy failed while indexing a committed block.
    #[error("indexing failed: {0}")]
    IndexingFailed(String),

    /// The persistence façade could not reach its backing store.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// The ZK verifier rejected, or errored on, a reaction proof.
    #[error("zk verification error: {0}")]
    ZkVerificationError(String),
}

/// The RPC-visible status the core collapses every [`CoreError`] into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcStatus {
    Accepted,
    Pending,
    AlreadyExists,
    Rejected,
    InvalidArgument,
    Internal,
}

impl CoreError {
    /// Map this error onto the RPC-visible status it should surface as.
    #[must_use]
    pub fn rpc_status(&self) -> RpcStatus {
        match self {
            Self::InvalidArgument(_) => RpcStatus::InvalidArgument,
            Self::UnknownPayloadKind(_) => RpcStatus::Internal,
            Self::ValidationFailed(_) | Self::ZkVerificationError(_) => RpcStatus::Rejected,
            Self::Duplicate(_) => RpcStatus::AlreadyExists,
            Self::AssemblyConflict(_) | Self::IndexingFailed(_) => RpcStatus::Internal,
            Self::PersistenceUnavailable(_) => RpcStatus::Rejected,
        }
    }
}
