//! The reaction proof verifier predicate.
//!
//! The core treats ZK verification as an opaque `ZkVerifier::verify` call:
//! it never inspects a proof's internal structure, only the accept/reject
//! outcome. [`ToyCircuitVerifier`] is one concrete circuit good enough to
//! exercise the full pipeline (prove in tests, verify in the validator);
//! swapping in a production circuit means writing a new [`ZkVerifier`],
//! not touching any caller.

use crate::errors::ZkpError;
use crate::field::FieldElement;
use crate::proof::{Proof, Verifier};

/// Everything a reaction proof is checked against, gathered by the caller
/// from the Feeds/Reactions façades before `verify` is invoked.
#[derive(Clone, Debug)]
pub struct PublicInputs {
    pub nullifier: [u8; 32],
    pub vote_c1x: Vec<[u8; 32]>,
    pub vote_c1y: Vec<[u8; 32]>,
    pub vote_c2x: Vec<[u8; 32]>,
    pub vote_c2y: Vec<[u8; 32]>,
    pub message_id_bytes: [u8; 16],
    pub feed_public_key: [u8; 32],
    pub merkle_root: [u8; 32],
    pub author_commitment: [u8; 32],
}

impl PublicInputs {
    fn to_field_elements(&self) -> Vec<FieldElement> {
        let mut elements = vec![FieldElement::from_bytes(&self.nullifier)];
        for array in [&self.vote_c1x, &self.vote_c1y, &self.vote_c2x, &self.vote_c2y] {
            elements.extend(array.iter().map(|coord| FieldElement::from_bytes(coord)));
        }
        elements.push(FieldElement::from_bytes(&self.message_id_bytes));
        elements.push(FieldElement::from_bytes(&self.feed_public_key));
        elements.push(FieldElement::from_bytes(&self.merkle_root));
        elements.push(FieldElement::from_bytes(&self.author_commitment));
        elements
    }
}

/// A predicate over (proof, public inputs, circuit version). Never panics;
/// any internal failure surfaces as `Err`, which callers reject on.
pub trait ZkVerifier: Send + Sync {
    fn verify(&self, proof: &[u8], public_inputs: &PublicInputs, circuit_version: &str) -> Result<bool, ZkpError>;
}

/// The one concrete circuit shipped with this node: a toy Plonky2-style
/// verifier over the Goldilocks field, plus a `dev-mode` bypass that lets
/// integration tests submit reactions without generating a real proof.
#[derive(Debug, Default)]
pub struct ToyCircuitVerifier;

impl ToyCircuitVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Circuit versions starting with this prefix skip verification entirely.
pub const DEV_MODE_PREFIX: &str = "dev-mode";

impl ZkVerifier for ToyCircuitVerifier {
    fn verify(&self, proof_bytes: &[u8], public_inputs: &PublicInputs, circuit_version: &str) -> Result<bool, ZkpError> {
        if circuit_version.starts_with(DEV_MODE_PREFIX) {
            return Ok(true);
        }

        let proof: Proof = bincode::deserialize(proof_bytes).map_err(|_| ZkpError::InvalidCommitment)?;
        let verifier = Verifier::new();
        let inputs = public_inputs.to_field_elements();
        Ok(verifier.verify(&proof, &inputs))
    }
}
