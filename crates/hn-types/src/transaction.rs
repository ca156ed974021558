//! The transaction envelope: Unsigned → Signed → Validated.
//!
//! Each state's canonical JSON is what gets signed to produce the next
//! state's signature, so `Signed::canonical_json()` is exactly the bytes
//! `UserSignature` was computed over, and likewise for `Validated`.

use crate::address::PublicAddress;
use crate::ids::TransactionId;
use crate::payload::{PayloadKind, TransactionPayload};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A signatory address paired with the signature bytes it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub signatory_public_address: PublicAddress,
    pub signature: Vec<u8>,
}

/// A transaction that has not yet been signed by its submitting user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub transaction_id: TransactionId,
    pub payload_kind: PayloadKind,
    pub timestamp: Timestamp,
    pub payload: TransactionPayload,
    pub payload_size: u32,
}

impl UnsignedTransaction {
    /// Build an unsigned transaction from a payload, stamping the
    /// current time and computing `payload_size` from its canonical JSON.
    pub fn new(payload: TransactionPayload) -> serde_json::Result<Self> {
        let payload_size = payload.canonical_json()?.len() as u32;
        Ok(Self {
            transaction_id: TransactionId::new(),
            payload_kind: payload.kind(),
            timestamp: Timestamp::now(),
            payload,
            payload_size,
        })
    }

    /// Canonical JSON of this state — the bytes the user signature covers.
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// An unsigned transaction plus the submitting user's signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub unsigned: UnsignedTransaction,
    pub user_signature: SignatureInfo,
}

impl SignedTransaction {
    /// Canonical JSON of this state — the bytes the validator signature covers.
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Project back to the unsigned envelope.
    #[must_use]
    pub fn extract_unsigned(&self) -> &UnsignedTransaction {
        &self.unsigned
    }
}

/// A signed transaction countersigned by the block-producer validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedTransaction {
    #[serde(flatten)]
    pub signed: SignedTransaction,
    pub validator_signature: SignatureInfo,
}

impl ValidatedTransaction {
    /// Canonical JSON of this fully-validated state.
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Project back to the signed envelope.
    #[must_use]
    pub fn extract_signed(&self) -> &SignedTransaction {
        &self.signed
    }

    #[must_use]
    pub fn transaction_id(&self) -> TransactionId {
        self.signed.unsigned.transaction_id
    }

    #[must_use]
    pub fn payload_kind(&self) -> PayloadKind {
        self.signed.unsigned.payload_kind
    }

    #[must_use]
    pub fn payload(&self) -> &TransactionPayload {
        &self.signed.unsigned.payload
    }
}
