//! Reactions domain: encrypted tallies, nullifiers, and the membership tree.

use crate::ids::{FeedId, FeedMessageId};
use crate::payload::CurveCoordinate;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Per-message aggregate of encrypted reaction votes.
///
/// Each coordinate array holds one entry per emoji slot
/// ([`crate::payload::REACTION_SLOT_COUNT`]); the pair `(c1, c2)` forms
/// an ElGamal-style ciphertext that additively combines under
/// `hn_crypto::reaction::combine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionTally {
    pub message_id: FeedMessageId,
    pub feed_id: FeedId,
    pub tally_c1x: Vec<CurveCoordinate>,
    pub tally_c1y: Vec<CurveCoordinate>,
    pub tally_c2x: Vec<CurveCoordinate>,
    pub tally_c2y: Vec<CurveCoordinate>,
    pub total_count: u64,
    pub version: u64,
}

impl MessageReactionTally {
    /// A fresh, all-zero tally for a message that has no votes yet.
    #[must_use]
    pub fn zero(message_id: FeedMessageId, feed_id: FeedId) -> Self {
        let zero_slots = || vec![[0u8; 32]; crate::payload::REACTION_SLOT_COUNT];
        Self {
            message_id,
            feed_id,
            tally_c1x: zero_slots(),
            tally_c1y: zero_slots(),
            tally_c2x: zero_slots(),
            tally_c2y: zero_slots(),
            total_count: 0,
            version: 0,
        }
    }
}

/// A nullifier record: the single row tracking a reaction's (user,
/// message) pair without revealing the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionNullifier {
    pub nullifier: [u8; 32],
    pub message_id: FeedMessageId,
    pub vote_c1x: Vec<CurveCoordinate>,
    pub vote_c1y: Vec<CurveCoordinate>,
    pub vote_c2x: Vec<CurveCoordinate>,
    pub vote_c2y: Vec<CurveCoordinate>,
    pub encrypted_backup: Option<Vec<u8>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A registered member commitment, deliberately not linked to any identity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMemberCommitment {
    pub feed_id: FeedId,
    pub user_commitment: [u8; 32],
}

/// A historical Merkle root for a feed's membership tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleRootHistory {
    pub feed_id: FeedId,
    pub merkle_root: [u8; 32],
    pub block_height: u64,
    pub created_at: Timestamp,
}
