//! Wire-level byte-length validation (spec §6).
//!
//! `FeedId`/`FeedMessageId` arrive as 16 raw bytes, nullifiers and
//! commitments as 32; anything else is malformed before it reaches a
//! repository or validator.

use uuid::Uuid;

use hn_types::{CoreError, FeedId, FeedMessageId};

fn wrong_length(what: &str, expected: usize, actual: usize) -> CoreError {
    CoreError::InvalidArgument(format!("{what} must be {expected} bytes, got {actual}"))
}

pub fn parse_feed_id(bytes: &[u8]) -> Result<FeedId, CoreError> {
    let array: [u8; 16] = bytes
        .try_into()
        .map_err(|_| wrong_length("feedId", 16, bytes.len()))?;
    Ok(FeedId(Uuid::from_bytes(array)))
}

pub fn parse_message_id(bytes: &[u8]) -> Result<FeedMessageId, CoreError> {
    let array: [u8; 16] = bytes
        .try_into()
        .map_err(|_| wrong_length("messageId", 16, bytes.len()))?;
    Ok(FeedMessageId(Uuid::from_bytes(array)))
}

pub fn parse_nullifier(bytes: &[u8]) -> Result<[u8; 32], CoreError> {
    bytes.try_into().map_err(|_| wrong_length("nullifier", 32, bytes.len()))
}

pub fn parse_commitment(bytes: &[u8]) -> Result<[u8; 32], CoreError> {
    bytes.try_into().map_err(|_| wrong_length("commitment", 32, bytes.len()))
}
