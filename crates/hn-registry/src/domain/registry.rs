//! The transaction registry itself.

use std::collections::HashMap;

use hn_types::{PayloadKind, SignedTransaction, ValidatedTransaction};

use super::entities::{DecodedTransaction, RegistryEntry};
use super::errors::RegistryError;

/// Maps payload-kind tag to decoder, validator, and index strategy.
///
/// Populated once at startup (`node-runtime` wires one entry per
/// payload kind) and read concurrently thereafter; entries are never
/// mutated after registration, so lookups need no locking.
#[derive(Default)]
pub struct TransactionRegistry {
    entries: HashMap<PayloadKind, RegistryEntry>,
}

impl TransactionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register one entry. Replaces any existing entry for the same kind.
    pub fn register(&mut self, entry: RegistryEntry) {
        self.entries.insert(entry.kind, entry);
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a payload kind.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownPayloadKind`] if no entry was
    /// registered for this kind.
    pub fn lookup(&self, kind: PayloadKind) -> Result<&RegistryEntry, RegistryError> {
        self.entries
            .get(&kind)
            .ok_or(RegistryError::UnknownPayloadKind(kind))
    }

    /// Decode a signed-transaction envelope and confirm its kind is registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Malformed`] if the bytes don't parse, or
    /// [`RegistryError::UnknownPayloadKind`] if its kind has no entry.
    pub fn decode_signed(&self, bytes: &[u8]) -> Result<SignedTransaction, RegistryError> {
        let signed: SignedTransaction =
            serde_json::from_slice(bytes).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        self.lookup(signed.unsigned.payload_kind)?;
        Ok(signed)
    }

    /// Decode a validated-transaction envelope and confirm its kind is registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Malformed`] if the bytes don't parse, or
    /// [`RegistryError::UnknownPayloadKind`] if its kind has no entry.
    pub fn decode_validated(&self, bytes: &[u8]) -> Result<ValidatedTransaction, RegistryError> {
        let validated: ValidatedTransaction =
            serde_json::from_slice(bytes).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        self.lookup(validated.payload_kind())?;
        Ok(validated)
    }

    /// Polymorphic decode: figure out whether the bytes are a `Signed` or
    /// `Validated` envelope by the presence of `validator_signature`, then
    /// confirm the payload kind is registered.
    ///
    /// A `Validated` envelope is a strict superset of a `Signed` one (it
    /// flattens `SignedTransaction` and adds `validator_signature`), so
    /// trying the richer shape first and falling back is exact: bytes
    /// missing `validator_signature` can never parse as `Validated`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Malformed`] if the bytes match neither
    /// shape, or [`RegistryError::UnknownPayloadKind`] if the decoded
    /// kind has no entry.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedTransaction, RegistryError> {
        let decoded = match serde_json::from_slice::<ValidatedTransaction>(bytes) {
            Ok(validated) => DecodedTransaction::Validated(validated),
            Err(_) => {
                let signed: SignedTransaction = serde_json::from_slice(bytes)
                    .map_err(|e| RegistryError::Malformed(e.to_string()))?;
                DecodedTransaction::Signed(signed)
            }
        };

        self.lookup(decoded.payload_kind())?;
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ContentValidator, IndexStrategy};
    use async_trait::async_trait;
    use hn_types::payload::RewardPayload;
    use hn_types::{
        BlockIndex, CoreError, SignatureInfo, TransactionPayload, UnsignedTransaction,
    };
    use std::sync::Arc;

    struct StubValidator;

    #[async_trait]
    impl ContentValidator for StubValidator {
        fn can_validate(&self, kind: PayloadKind) -> bool {
            kind == PayloadKind::REWARD
        }

        async fn validate_and_sign(
            &self,
            tx: &SignedTransaction,
        ) -> Result<ValidatedTransaction, CoreError> {
            Ok(ValidatedTransaction {
                signed: tx.clone(),
                validator_signature: SignatureInfo {
                    signatory_public_address: "validator".into(),
                    signature: vec![],
                },
            })
        }
    }

    struct StubStrategy;

    #[async_trait]
    impl IndexStrategy for StubStrategy {
        fn can_handle(&self, kind: PayloadKind) -> bool {
            kind == PayloadKind::REWARD
        }

        async fn handle(
            &self,
            _tx: &ValidatedTransaction,
            _block_index: BlockIndex,
        ) -> Result<(), CoreError> {
            Ok(())
        }
    }

    fn registry_with_reward_entry() -> TransactionRegistry {
        let mut registry = TransactionRegistry::new();
        registry.register(RegistryEntry::new(
            PayloadKind::REWARD,
            Arc::new(StubValidator),
            Arc::new(StubStrategy),
        ));
        registry
    }

    fn sample_signed() -> SignedTransaction {
        let payload = TransactionPayload::Reward(RewardPayload {
            issuer: "producer".into(),
            token: "HUSH".into(),
            amount: "1".to_string(),
        });
        SignedTransaction {
            unsigned: UnsignedTransaction::new(payload).unwrap(),
            user_signature: SignatureInfo {
                signatory_public_address: "producer".into(),
                signature: vec![],
            },
        }
    }

    #[test]
    fn lookup_fails_for_unregistered_kind() {
        let registry = TransactionRegistry::new();
        let err = registry.lookup(PayloadKind::SEND_FUNDS).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownPayloadKind(_)));
    }

    #[test]
    fn decode_dispatches_to_signed_when_no_validator_signature() {
        let registry = registry_with_reward_entry();
        let signed = sample_signed();
        let bytes = serde_json::to_vec(&signed).unwrap();

        let decoded = registry.decode(&bytes).unwrap();
        assert!(matches!(decoded, DecodedTransaction::Signed(_)));
    }

    #[test]
    fn decode_dispatches_to_validated_when_validator_signature_present() {
        let registry = registry_with_reward_entry();
        let validated = ValidatedTransaction {
            signed: sample_signed(),
            validator_signature: SignatureInfo {
                signatory_public_address: "validator".into(),
                signature: vec![9],
            },
        };
        let bytes = serde_json::to_vec(&validated).unwrap();

        let decoded = registry.decode(&bytes).unwrap();
        assert!(matches!(decoded, DecodedTransaction::Validated(_)));
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        let registry = TransactionRegistry::new();
        let bytes = serde_json::to_vec(&sample_signed()).unwrap();
        let err = registry.decode(&bytes).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownPayloadKind(_)));
    }

    #[tokio::test]
    async fn looked_up_entry_exposes_a_working_validator_and_strategy() {
        let registry = registry_with_reward_entry();
        let entry = registry.lookup(PayloadKind::REWARD).unwrap();
        assert!(entry.validator.can_validate(PayloadKind::REWARD));

        let validated = entry
            .validator
            .validate_and_sign(&sample_signed())
            .await
            .unwrap();
        assert!(entry.strategy.can_handle(PayloadKind::REWARD));
        entry
            .strategy
            .handle(&validated, BlockIndex::GENESIS)
            .await
            .unwrap();
    }
}
