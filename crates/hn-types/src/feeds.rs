//! Feeds domain: feeds, participants, and messages.

use crate::address::PublicAddress;
use crate::ids::{BlockIndex, FeedId, FeedMessageId};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// The kind of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedType {
    Personal,
    Chat,
    Group,
}

/// A feed (personal, chat, or group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub feed_id: FeedId,
    pub title: String,
    pub feed_type: FeedType,
    pub block_index: BlockIndex,
    pub participants: Vec<PublicAddress>,
}

/// A participant's role within a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantType {
    Owner,
    Member,
    Banned,
}

/// Membership row for `(feed_id, member_public_address)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedParticipant {
    pub feed_id: FeedId,
    pub member_public_address: PublicAddress,
    pub participant_type: ParticipantType,
    pub encrypted_feed_key: String,
    pub key_generation: u32,
}

/// A message posted into a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub feed_message_id: FeedMessageId,
    pub feed_id: FeedId,
    pub issuer_public_address: PublicAddress,
    pub content: String,
    pub timestamp: Timestamp,
    pub block_index: BlockIndex,
}
