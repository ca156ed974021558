//! Shared transaction-submission pipeline (spec §6, §4.7, §4.6, §4.5).
//!
//! Every RPC method that accepts a signed transaction —
//! `HushBlockchain.SubmitSignedTransaction` and every write under
//! `HushFeeds.*` — funnels through this one path: decode, validate,
//! dedup-gate `NewFeedMessage` submissions, enqueue. `HushFeeds.*`
//! methods are named wrappers over exactly this for client ergonomics;
//! there is no second code path.

use std::sync::Arc;

use hn_idempotency::{CheckOutcome, IdempotencyGate};
use hn_mempool::Mempool;
use hn_registry::{RegistryError, TransactionRegistry};
use hn_types::{CoreError, RpcStatus, TransactionPayload};

/// The response shape of every transaction-submitting RPC method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTransactionResponse {
    pub status: RpcStatus,
    pub message: String,
}

impl SubmitTransactionResponse {
    fn ok(status: RpcStatus, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    fn from_error(err: CoreError) -> Self {
        Self { status: err.rpc_status(), message: err.to_string() }
    }
}

fn registry_err(err: RegistryError) -> CoreError {
    match err {
        RegistryError::Malformed(msg) => CoreError::InvalidArgument(msg),
        RegistryError::UnknownPayloadKind(kind) => CoreError::UnknownPayloadKind(kind.to_string()),
        RegistryError::KindMismatch { claimed, actual } => {
            CoreError::InvalidArgument(format!("envelope claims {claimed}, payload tag is {actual}"))
        }
    }
}

pub struct TransactionIngress {
    registry: Arc<TransactionRegistry>,
    idempotency: Arc<IdempotencyGate>,
    mempool: Arc<Mempool>,
}

impl TransactionIngress {
    #[must_use]
    pub fn new(registry: Arc<TransactionRegistry>, idempotency: Arc<IdempotencyGate>, mempool: Arc<Mempool>) -> Self {
        Self { registry, idempotency, mempool }
    }

    /// Decode, validate, dedup-gate, and enqueue a signed-transaction envelope.
    pub async fn submit(&self, bytes: &[u8]) -> SubmitTransactionResponse {
        match self.try_submit(bytes).await {
            Ok(response) => response,
            Err(err) => SubmitTransactionResponse::from_error(err),
        }
    }

    async fn try_submit(&self, bytes: &[u8]) -> Result<SubmitTransactionResponse, CoreError> {
        let signed = self.registry.decode_signed(bytes).map_err(registry_err)?;
        let entry = self
            .registry
            .lookup(signed.unsigned.payload_kind)
            .map_err(registry_err)?;
        let validated = entry.validator.validate_and_sign(&signed).await?;

        let TransactionPayload::NewFeedMessage(payload) = validated.payload() else {
            self.mempool.add(validated);
            return Ok(SubmitTransactionResponse::ok(RpcStatus::Accepted, "accepted"));
        };

        let id = payload.feed_message_id;
        match self.idempotency.check(id) {
            CheckOutcome::Accepted => {
                if self.idempotency.try_track(id) {
                    self.mempool.add(validated);
                    Ok(SubmitTransactionResponse::ok(RpcStatus::Accepted, "accepted"))
                } else {
                    Ok(SubmitTransactionResponse::ok(RpcStatus::Pending, "already in flight"))
                }
            }
            CheckOutcome::Pending => Ok(SubmitTransactionResponse::ok(RpcStatus::Pending, "already in flight")),
            CheckOutcome::AlreadyExists => {
                Ok(SubmitTransactionResponse::ok(RpcStatus::AlreadyExists, "already committed"))
            }
            CheckOutcome::Rejected => {
                Err(CoreError::PersistenceUnavailable("idempotency lookup failed".into()))
            }
        }
    }
}
