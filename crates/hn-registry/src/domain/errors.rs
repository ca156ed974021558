//! Registry errors.

use hn_types::PayloadKind;
use thiserror::Error;

/// Errors raised while decoding or dispatching a transaction.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No entry is registered for this payload kind.
    #[error("unknown payload kind: {0}")]
    UnknownPayloadKind(PayloadKind),

    /// The raw bytes did not parse as a transaction envelope.
    #[error("malformed transaction: {0}")]
    Malformed(String),

    /// The decoded envelope's `payload_kind` field didn't match the
    /// kind its nested payload tag carries.
    #[error("payload kind mismatch: envelope claims {claimed}, payload tag is {actual}")]
    KindMismatch {
        claimed: PayloadKind,
        actual: PayloadKind,
    },
}
