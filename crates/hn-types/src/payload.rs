//! Transaction payloads and their kind tags.
//!
//! `PayloadKind` is a 128-bit tag, one constant per variant, so the
//! registry (see `hn-registry`) can dispatch on it without reflection.
//! Payload bodies are otherwise opaque to the core: nothing here
//! interprets payload content beyond the specific fields an index
//! strategy or content validator needs to act on.

use crate::address::{PublicAddress, Token};
use crate::ids::{FeedId, FeedMessageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit tag uniquely identifying a transaction payload variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadKind(pub u128);

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#034x}", self.0)
    }
}

macro_rules! payload_kind {
    ($name:ident, $lit:literal) => {
        pub const $name: PayloadKind = PayloadKind($lit);
    };
}

impl PayloadKind {
    payload_kind!(REWARD, 0x0001_0000_0000_0000_0000_0000_0000_0001);
    payload_kind!(FULL_IDENTITY, 0x0001_0000_0000_0000_0000_0000_0000_0002);
    payload_kind!(UPDATE_IDENTITY, 0x0001_0000_0000_0000_0000_0000_0000_0003);
    payload_kind!(NEW_PERSONAL_FEED, 0x0001_0000_0000_0000_0000_0000_0000_0004);
    payload_kind!(NEW_CHAT_FEED, 0x0001_0000_0000_0000_0000_0000_0000_0005);
    payload_kind!(JOIN_GROUP_FEED, 0x0001_0000_0000_0000_0000_0000_0000_0006);
    payload_kind!(LEAVE_GROUP_FEED, 0x0001_0000_0000_0000_0000_0000_0000_0007);
    payload_kind!(NEW_FEED_MESSAGE, 0x0001_0000_0000_0000_0000_0000_0000_0008);
    payload_kind!(SEND_FUNDS, 0x0001_0000_0000_0000_0000_0000_0000_0009);
    payload_kind!(NEW_REACTION, 0x0001_0000_0000_0000_0000_0000_0000_000a);
}

/// A 32-byte elliptic-curve coordinate, one "slot" of an encrypted tally.
pub type CurveCoordinate = [u8; 32];

/// Number of emoji slots carried by a reaction ciphertext/tally.
pub const REACTION_SLOT_COUNT: usize = 6;

/// The reward paid to the block producer for assembling a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardPayload {
    pub issuer: PublicAddress,
    pub token: Token,
    pub amount: String,
}

/// First-time identity registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullIdentityPayload {
    pub public_signing_address: PublicAddress,
    pub alias: String,
    pub short_alias: String,
    pub public_encrypt_address: PublicAddress,
    pub is_public: bool,
}

/// Mutation of an existing identity's alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateIdentityPayload {
    pub public_signing_address: PublicAddress,
    pub alias: String,
}

/// Creation of a user's own personal feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPersonalFeedPayload {
    pub feed_id: FeedId,
    pub owner: PublicAddress,
    pub encrypted_feed_key: String,
}

/// Creation of a direct/chat feed between participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChatFeedPayload {
    pub feed_id: FeedId,
    pub creator: PublicAddress,
    pub participants: Vec<PublicAddress>,
    pub encrypted_feed_key: String,
}

/// Request to join a group feed, carrying the Merkle-tree commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinGroupFeedPayload {
    pub feed_id: FeedId,
    pub member: PublicAddress,
    pub user_commitment: [u8; 32],
    pub encrypted_feed_key: String,
    pub key_generation: u32,
}

/// Request to leave a group feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveGroupFeedPayload {
    pub feed_id: FeedId,
    pub member: PublicAddress,
}

/// A new message posted into a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedMessagePayload {
    pub feed_message_id: FeedMessageId,
    pub feed_id: FeedId,
    pub issuer: PublicAddress,
    pub content: String,
}

/// A fund transfer between two addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendFundsPayload {
    pub from: PublicAddress,
    pub to: PublicAddress,
    pub token: Token,
    pub amount: String,
}

/// An anonymous, ZK-proven reaction to a feed message.
///
/// Each of the four coordinate arrays is expected to carry exactly
/// [`REACTION_SLOT_COUNT`] elements; `hn-validators` enforces this before
/// the proof is ever checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReactionPayload {
    pub message_id: FeedMessageId,
    pub feed_id: FeedId,
    pub nullifier: [u8; 32],
    pub vote_c1x: Vec<CurveCoordinate>,
    pub vote_c1y: Vec<CurveCoordinate>,
    pub vote_c2x: Vec<CurveCoordinate>,
    pub vote_c2y: Vec<CurveCoordinate>,
    pub encrypted_backup: Option<Vec<u8>>,
    pub circuit_version: String,
    pub proof: Vec<u8>,
}

/// The sum type of every payload a transaction may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body")]
pub enum TransactionPayload {
    Reward(RewardPayload),
    FullIdentity(FullIdentityPayload),
    UpdateIdentity(UpdateIdentityPayload),
    NewPersonalFeed(NewPersonalFeedPayload),
    NewChatFeed(NewChatFeedPayload),
    JoinGroupFeed(JoinGroupFeedPayload),
    LeaveGroupFeed(LeaveGroupFeedPayload),
    NewFeedMessage(NewFeedMessagePayload),
    SendFunds(SendFundsPayload),
    NewReaction(NewReactionPayload),
}

impl TransactionPayload {
    /// The kind tag for this payload's variant.
    #[must_use]
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Reward(_) => PayloadKind::REWARD,
            Self::FullIdentity(_) => PayloadKind::FULL_IDENTITY,
            Self::UpdateIdentity(_) => PayloadKind::UPDATE_IDENTITY,
            Self::NewPersonalFeed(_) => PayloadKind::NEW_PERSONAL_FEED,
            Self::NewChatFeed(_) => PayloadKind::NEW_CHAT_FEED,
            Self::JoinGroupFeed(_) => PayloadKind::JOIN_GROUP_FEED,
            Self::LeaveGroupFeed(_) => PayloadKind::LEAVE_GROUP_FEED,
            Self::NewFeedMessage(_) => PayloadKind::NEW_FEED_MESSAGE,
            Self::SendFunds(_) => PayloadKind::SEND_FUNDS,
            Self::NewReaction(_) => PayloadKind::NEW_REACTION,
        }
    }

    /// Canonical JSON form of this payload (field order = declared order,
    /// since `serde_json` preserves struct field order by default).
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_distinct() {
        let kinds = [
            PayloadKind::REWARD,
            PayloadKind::FULL_IDENTITY,
            PayloadKind::UPDATE_IDENTITY,
            PayloadKind::NEW_PERSONAL_FEED,
            PayloadKind::NEW_CHAT_FEED,
            PayloadKind::JOIN_GROUP_FEED,
            PayloadKind::LEAVE_GROUP_FEED,
            PayloadKind::NEW_FEED_MESSAGE,
            PayloadKind::SEND_FUNDS,
            PayloadKind::NEW_REACTION,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn payload_kind_matches_variant() {
        let p = TransactionPayload::SendFunds(SendFundsPayload {
            from: "alice".into(),
            to: "bob".into(),
            token: "HUSH".into(),
            amount: "3".to_string(),
        });
        assert_eq!(p.kind(), PayloadKind::SEND_FUNDS);
    }

    #[test]
    fn canonical_json_round_trips() {
        let p = TransactionPayload::NewFeedMessage(NewFeedMessagePayload {
            feed_message_id: FeedMessageId::new(),
            feed_id: FeedId::new(),
            issuer: "alice".into(),
            content: "hi".to_string(),
        });
        let json = p.canonical_json().unwrap();
        let back: TransactionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
