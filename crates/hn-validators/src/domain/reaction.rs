//! The reaction ZK validator: structural/signature baseline plus the
//! five-step proof-acceptance pipeline (§4.7).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use hn_crypto::{blake3_hash, Ed25519KeyPair};
use hn_persistence::PersistenceFacade;
use hn_registry::ContentValidator;
use hn_types::payload::{NewReactionPayload, REACTION_SLOT_COUNT};
use hn_types::{CoreError, PayloadKind, SignedTransaction, TransactionPayload, ValidatedTransaction};
use hn_zk::{PublicInputs, ZkVerifier, DEV_MODE_PREFIX};

use super::crypto_helpers::{countersign, validate_structure_and_user_signature};

/// Number of most-recent Merkle roots tried before a reaction is rejected.
const GRACE_WINDOW: usize = 3;

/// Validates `NewReactionPayload` transactions.
pub struct ReactionValidator {
    validator_keypair: Arc<Ed25519KeyPair>,
    persistence: PersistenceFacade,
    zk_verifier: Arc<dyn ZkVerifier>,
}

impl ReactionValidator {
    /// Build a reaction validator over the given persistence façade and ZK verifier.
    pub fn new(
        validator_keypair: Arc<Ed25519KeyPair>,
        persistence: PersistenceFacade,
        zk_verifier: Arc<dyn ZkVerifier>,
    ) -> Self {
        Self {
            validator_keypair,
            persistence,
            zk_verifier,
        }
    }

    fn reject(reason: impl Into<String>) -> CoreError {
        CoreError::ZkVerificationError(reason.into())
    }

    /// Derived stand-in for a feed's public key: every Feed row carries
    /// no separate asymmetric key of its own, so this hashes the stable
    /// feed id the same way on every node. Presence of the feed row is
    /// still what gates "missing".
    fn feed_public_key(&self, feed_id: hn_types::FeedId) -> Result<[u8; 32], CoreError> {
        let uow = self.persistence.create_read_only();
        uow.feeds()
            .get_feed(feed_id)
            .map_err(|e| Self::reject(format!("feed lookup failed: {e}")))?
            .ok_or_else(|| Self::reject("feed public key missing"))?;
        Ok(blake3_hash(feed_id.to_string().as_bytes()))
    }

    /// Derived stand-in for the reacted-to message's author commitment,
    /// gated the same way: the message row must exist.
    fn author_commitment(&self, message_id: hn_types::FeedMessageId) -> Result<[u8; 32], CoreError> {
        let uow = self.persistence.create_read_only();
        uow.feeds()
            .get_message(message_id)
            .map_err(|e| Self::reject(format!("message lookup failed: {e}")))?
            .ok_or_else(|| Self::reject("author commitment missing"))?;
        Ok(blake3_hash(message_id.to_string().as_bytes()))
    }

    fn verify_proof(&self, payload: &NewReactionPayload) -> Result<(), CoreError> {
        for array in [
            &payload.vote_c1x,
            &payload.vote_c1y,
            &payload.vote_c2x,
            &payload.vote_c2y,
        ] {
            if array.len() != REACTION_SLOT_COUNT {
                return Err(Self::reject(format!(
                    "ciphertext array has {} slots, expected {REACTION_SLOT_COUNT}",
                    array.len()
                )));
            }
        }

        if payload.circuit_version.starts_with(DEV_MODE_PREFIX) {
            return Ok(());
        }

        let feed_public_key = self.feed_public_key(payload.feed_id)?;
        let author_commitment = self.author_commitment(payload.message_id)?;

        let roots = {
            let uow = self.persistence.create_read_only();
            uow.feeds()
                .latest_roots(payload.feed_id, GRACE_WINDOW)
                .map_err(|e| Self::reject(format!("root history lookup failed: {e}")))?
        };
        if roots.is_empty() {
            return Err(Self::reject("no Merkle roots recorded for feed"));
        }

        let mut message_id_bytes = [0u8; 16];
        message_id_bytes.copy_from_slice(payload.message_id.0.as_bytes());

        for root in &roots {
            let inputs = PublicInputs {
                nullifier: payload.nullifier,
                vote_c1x: payload.vote_c1x.clone(),
                vote_c1y: payload.vote_c1y.clone(),
                vote_c2x: payload.vote_c2x.clone(),
                vote_c2y: payload.vote_c2y.clone(),
                message_id_bytes,
                feed_public_key,
                merkle_root: root.merkle_root,
                author_commitment,
            };
            match self
                .zk_verifier
                .verify(&payload.proof, &inputs, &payload.circuit_version)
            {
                Ok(true) => {
                    hn_telemetry::ZK_VERIFICATIONS.with_label_values(&["accepted"]).inc();
                    return Ok(());
                }
                Ok(false) => continue,
                Err(err) => {
                    error!(%err, "zk verifier errored, treating as rejection");
                    hn_telemetry::ZK_VERIFICATIONS.with_label_values(&["error"]).inc();
                    return Err(Self::reject(format!("zk verifier error: {err}")));
                }
            }
        }

        hn_telemetry::ZK_VERIFICATIONS.with_label_values(&["rejected"]).inc();
        Err(Self::reject("proof did not verify against any grace-window root"))
    }
}

#[async_trait]
impl ContentValidator for ReactionValidator {
    fn can_validate(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::NEW_REACTION
    }

    async fn validate_and_sign(&self, tx: &SignedTransaction) -> Result<ValidatedTransaction, CoreError> {
        validate_structure_and_user_signature(tx)?;

        let TransactionPayload::NewReaction(payload) = &tx.unsigned.payload else {
            return Err(CoreError::ValidationFailed(
                "reaction validator invoked on a non-reaction payload".into(),
            ));
        };

        if let Err(err) = self.verify_proof(payload) {
            warn!(transaction_id = %tx.unsigned.transaction_id, %err, "rejecting reaction");
            return Err(err);
        }

        let validator_signature = countersign(tx, &self.validator_keypair)?;
        Ok(ValidatedTransaction {
            signed: tx.clone(),
            validator_signature,
        })
    }
}
