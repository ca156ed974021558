//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// A reaction ciphertext coordinate array did not have the expected slot count
    #[error("invalid slot count: expected {expected}, got {actual}")]
    InvalidSlotCount {
        /// Expected number of slots
        expected: usize,
        /// Actual number of slots
        actual: usize,
    },

    /// A coordinate did not decode to a valid curve point
    #[error("invalid curve point at slot {0}")]
    InvalidCurvePoint(usize),

    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),
}
