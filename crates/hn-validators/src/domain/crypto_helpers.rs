//! Shared plumbing between the structural and reaction validators:
//! decoding a [`PublicAddress`] to a raw key, checking the user
//! signature, and countersigning with the block-producer credential.

use hn_crypto::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use hn_types::{CoreError, PublicAddress, SignatureInfo, SignedTransaction};

/// A transaction's address is the hex encoding of its raw Ed25519 public key.
pub fn decode_address(address: &PublicAddress) -> Result<Ed25519PublicKey, CoreError> {
    let bytes = hex::decode(&address.0)
        .map_err(|e| CoreError::ValidationFailed(format!("malformed address: {e}")))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CoreError::ValidationFailed("address is not a 32-byte key".into()))?;
    Ed25519PublicKey::from_bytes(bytes)
        .map_err(|e| CoreError::ValidationFailed(format!("invalid public key: {e}")))
}

fn decode_signature(bytes: &[u8]) -> Result<Ed25519Signature, CoreError> {
    let bytes: [u8; 64] = bytes
        .to_vec()
        .try_into()
        .map_err(|_| CoreError::ValidationFailed("signature is not 64 bytes".into()))?;
    Ok(Ed25519Signature::from_bytes(bytes))
}

/// Encode a public key the way [`decode_address`] expects to read it back.
pub fn encode_address(key: &Ed25519PublicKey) -> PublicAddress {
    PublicAddress(hex::encode(key.as_bytes()))
}

/// Structural sanity plus user-signature verification, common to every
/// payload kind. Does not itself decide acceptance beyond this baseline —
/// callers layer kind-specific checks (e.g. the reaction pipeline) on top.
pub fn validate_structure_and_user_signature(tx: &SignedTransaction) -> Result<(), CoreError> {
    if tx.unsigned.payload_kind != tx.unsigned.payload.kind() {
        return Err(CoreError::ValidationFailed(
            "payload_kind does not match payload variant".into(),
        ));
    }

    let canonical = tx
        .unsigned
        .payload
        .canonical_json()
        .map_err(|e| CoreError::ValidationFailed(format!("payload not serializable: {e}")))?;
    if tx.unsigned.payload_size as usize != canonical.len() {
        return Err(CoreError::ValidationFailed(
            "payload_size does not match canonical payload length".into(),
        ));
    }

    let unsigned_json = tx
        .unsigned
        .canonical_json()
        .map_err(|e| CoreError::ValidationFailed(format!("unsigned transaction not serializable: {e}")))?;
    let signer = decode_address(&tx.user_signature.signatory_public_address)?;
    let signature = decode_signature(&tx.user_signature.signature)?;
    signer
        .verify(unsigned_json.as_bytes(), &signature)
        .map_err(|e| CoreError::ValidationFailed(format!("user signature invalid: {e}")))
}

/// Countersign the signed envelope with the block-producer's credential.
pub fn countersign(tx: &SignedTransaction, validator_keypair: &Ed25519KeyPair) -> Result<SignatureInfo, CoreError> {
    let signed_json = tx
        .canonical_json()
        .map_err(|e| CoreError::ValidationFailed(format!("signed transaction not serializable: {e}")))?;
    let signature = validator_keypair.sign(signed_json.as_bytes());
    Ok(SignatureInfo {
        signatory_public_address: encode_address(&validator_keypair.public_key()),
        signature: signature.as_bytes().to_vec(),
    })
}
