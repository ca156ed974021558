//! Structural-and-signature validator for the non-reaction payload kinds.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use hn_crypto::Ed25519KeyPair;
use hn_registry::ContentValidator;
use hn_types::{CoreError, PayloadKind, SignedTransaction, ValidatedTransaction};

use super::crypto_helpers::{countersign, validate_structure_and_user_signature};

/// Validates structural sanity and the user signature, then countersigns.
/// Covers every payload kind except [`PayloadKind::NEW_REACTION`], which
/// layers the ZK pipeline on top of this same baseline (see
/// [`super::reaction::ReactionValidator`]).
pub struct StructuralSignatureValidator {
    kinds: HashSet<PayloadKind>,
    validator_keypair: Arc<Ed25519KeyPair>,
}

impl StructuralSignatureValidator {
    /// Build a validator for exactly the given set of payload kinds.
    pub fn new(kinds: impl IntoIterator<Item = PayloadKind>, validator_keypair: Arc<Ed25519KeyPair>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            validator_keypair,
        }
    }

    /// Every non-reaction payload kind, the set this node wires up by default.
    pub fn all_non_reaction_kinds() -> [PayloadKind; 9] {
        [
            PayloadKind::REWARD,
            PayloadKind::FULL_IDENTITY,
            PayloadKind::UPDATE_IDENTITY,
            PayloadKind::NEW_PERSONAL_FEED,
            PayloadKind::NEW_CHAT_FEED,
            PayloadKind::JOIN_GROUP_FEED,
            PayloadKind::LEAVE_GROUP_FEED,
            PayloadKind::NEW_FEED_MESSAGE,
            PayloadKind::SEND_FUNDS,
        ]
    }
}

#[async_trait]
impl ContentValidator for StructuralSignatureValidator {
    fn can_validate(&self, kind: PayloadKind) -> bool {
        self.kinds.contains(&kind)
    }

    async fn validate_and_sign(&self, tx: &SignedTransaction) -> Result<ValidatedTransaction, CoreError> {
        if let Err(err) = validate_structure_and_user_signature(tx) {
            warn!(transaction_id = %tx.unsigned.transaction_id, %err, "rejecting transaction");
            return Err(err);
        }

        let validator_signature = countersign(tx, &self.validator_keypair)?;
        Ok(ValidatedTransaction {
            signed: tx.clone(),
            validator_signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_types::payload::RewardPayload;
    use hn_types::{SignatureInfo, TransactionPayload, UnsignedTransaction};

    fn sign(keypair: &Ed25519KeyPair, unsigned: &UnsignedTransaction) -> SignedTransaction {
        let json = unsigned.canonical_json().unwrap();
        let signature = keypair.sign(json.as_bytes());
        SignedTransaction {
            unsigned: unsigned.clone(),
            user_signature: SignatureInfo {
                signatory_public_address: super::super::crypto_helpers::encode_address(&keypair.public_key()),
                signature: signature.as_bytes().to_vec(),
            },
        }
    }

    fn reward_unsigned() -> UnsignedTransaction {
        UnsignedTransaction::new(TransactionPayload::Reward(RewardPayload {
            issuer: "producer".into(),
            token: "HUSH".into(),
            amount: "1".into(),
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn accepts_a_well_formed_transaction() {
        let user = Ed25519KeyPair::generate();
        let validator_keypair = Arc::new(Ed25519KeyPair::generate());
        let validator = StructuralSignatureValidator::new([PayloadKind::REWARD], validator_keypair);

        let signed = sign(&user, &reward_unsigned());
        let validated = validator.validate_and_sign(&signed).await.unwrap();
        assert_eq!(validated.transaction_id(), signed.unsigned.transaction_id);
    }

    #[tokio::test]
    async fn rejects_a_tampered_signature() {
        let user = Ed25519KeyPair::generate();
        let validator_keypair = Arc::new(Ed25519KeyPair::generate());
        let validator = StructuralSignatureValidator::new([PayloadKind::REWARD], validator_keypair);

        let mut signed = sign(&user, &reward_unsigned());
        signed.user_signature.signature[0] ^= 0xff;

        assert!(validator.validate_and_sign(&signed).await.is_err());
    }

    #[tokio::test]
    async fn rejects_a_payload_kind_mismatch() {
        let user = Ed25519KeyPair::generate();
        let validator_keypair = Arc::new(Ed25519KeyPair::generate());
        let validator = StructuralSignatureValidator::new([PayloadKind::REWARD], validator_keypair);

        let mut unsigned = reward_unsigned();
        unsigned.payload_kind = PayloadKind::SEND_FUNDS;
        let signed = sign(&user, &unsigned);

        assert!(validator.validate_and_sign(&signed).await.is_err());
    }

    #[test]
    fn can_validate_matches_only_the_configured_kinds() {
        let validator_keypair = Arc::new(Ed25519KeyPair::generate());
        let validator = StructuralSignatureValidator::new(
            StructuralSignatureValidator::all_non_reaction_kinds(),
            validator_keypair,
        );
        assert!(validator.can_validate(PayloadKind::REWARD));
        assert!(!validator.can_validate(PayloadKind::NEW_REACTION));
    }
}
