//! One repository per bounded context.
//!
//! Every repository is a thin typed wrapper over a namespaced
//! [`KvRepository`](super::view::KvRepository) — key layout and JSON
//! encoding live here, schema-free storage lives in `store`/`view`.

use hn_types::{
    AddressBalance, BlockId, BlockchainBlock, BlockchainState, Feed, FeedId, FeedMemberCommitment,
    FeedMessage, FeedMessageId, FeedParticipant, IdentityProfile, MerkleRootHistory,
    MessageReactionTally, PublicAddress, ReactionNullifier, Token,
};

use super::errors::PersistenceError;
use super::view::{KvRepository, View};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub struct BlockchainRepository<'a>(KvRepository<'a>);

impl<'a> BlockchainRepository<'a> {
    pub(crate) fn new(view: View<'a>) -> Self {
        Self(KvRepository::new(view, "blockchain"))
    }

    pub fn get_blockchain_state(&self) -> Result<Option<BlockchainState>, PersistenceError> {
        self.0.get("state")
    }

    pub fn upsert_blockchain_state(&self, state: &BlockchainState) -> Result<(), PersistenceError> {
        self.0.put("state", state)
    }

    pub fn get_block(&self, block_id: BlockId) -> Result<Option<BlockchainBlock>, PersistenceError> {
        self.0.get(&format!("block:{block_id}"))
    }

    pub fn insert_block(&self, block: &BlockchainBlock) -> Result<(), PersistenceError> {
        self.0.put(&format!("block:{}", block.block_id), block)
    }
}

pub struct BankRepository<'a>(KvRepository<'a>);

impl<'a> BankRepository<'a> {
    pub(crate) fn new(view: View<'a>) -> Self {
        Self(KvRepository::new(view, "bank"))
    }

    pub fn get_balance(
        &self,
        address: &PublicAddress,
        token: &Token,
    ) -> Result<Option<AddressBalance>, PersistenceError> {
        self.0.get(&format!("balance:{address}:{token}"))
    }

    pub fn upsert_balance(&self, balance: &AddressBalance) -> Result<(), PersistenceError> {
        self.0.put(
            &format!("balance:{}:{}", balance.public_address, balance.token),
            balance,
        )
    }

    /// Whether a transfer or reward keyed by `marker` has already been
    /// applied to a balance. Index strategies that mutate a balance by
    /// delta rather than by overwrite (reward, send-funds) aren't
    /// naturally idempotent on replay, so they record one of these
    /// before touching a balance row.
    pub fn is_applied(&self, marker: &str) -> Result<bool, PersistenceError> {
        Ok(self.0.get::<bool>(&format!("applied:{marker}"))?.is_some())
    }

    pub fn mark_applied(&self, marker: &str) -> Result<(), PersistenceError> {
        self.0.put(&format!("applied:{marker}"), &true)
    }
}

pub struct IdentityRepository<'a>(KvRepository<'a>);

impl<'a> IdentityRepository<'a> {
    pub(crate) fn new(view: View<'a>) -> Self {
        Self(KvRepository::new(view, "identity"))
    }

    pub fn get_profile(
        &self,
        address: &PublicAddress,
    ) -> Result<Option<IdentityProfile>, PersistenceError> {
        self.0.get(&format!("profile:{address}"))
    }

    pub fn upsert_profile(&self, profile: &IdentityProfile) -> Result<(), PersistenceError> {
        self.0
            .put(&format!("profile:{}", profile.public_signing_address), profile)
    }

    /// Every registered profile, for display-name search.
    pub fn list_profiles(&self) -> Result<Vec<IdentityProfile>, PersistenceError> {
        self.0.scan("profile:")
    }
}

pub struct FeedsRepository<'a>(KvRepository<'a>);

impl<'a> FeedsRepository<'a> {
    pub(crate) fn new(view: View<'a>) -> Self {
        Self(KvRepository::new(view, "feeds"))
    }

    pub fn get_feed(&self, feed_id: FeedId) -> Result<Option<Feed>, PersistenceError> {
        self.0.get(&format!("feed:{feed_id}"))
    }

    pub fn upsert_feed(&self, feed: &Feed) -> Result<(), PersistenceError> {
        self.0.put(&format!("feed:{}", feed.feed_id), feed)
    }

    /// Every feed, for listing a member's feeds by scanning `participants`.
    pub fn list_feeds(&self) -> Result<Vec<Feed>, PersistenceError> {
        self.0.scan("feed:")
    }

    /// Whether `owner` already has a personal feed.
    pub fn personal_feed_owner(
        &self,
        owner: &PublicAddress,
    ) -> Result<Option<FeedId>, PersistenceError> {
        self.0.get(&format!("personal_owner:{owner}"))
    }

    pub fn mark_personal_feed_owner(
        &self,
        owner: &PublicAddress,
        feed_id: FeedId,
    ) -> Result<(), PersistenceError> {
        self.0.put(&format!("personal_owner:{owner}"), &feed_id)
    }

    pub fn get_participant(
        &self,
        feed_id: FeedId,
        member: &PublicAddress,
    ) -> Result<Option<FeedParticipant>, PersistenceError> {
        self.0.get(&format!("participant:{feed_id}:{member}"))
    }

    pub fn upsert_participant(&self, participant: &FeedParticipant) -> Result<(), PersistenceError> {
        self.0.put(
            &format!(
                "participant:{}:{}",
                participant.feed_id, participant.member_public_address
            ),
            participant,
        )
    }

    pub fn delete_participant(
        &self,
        feed_id: FeedId,
        member: &PublicAddress,
    ) -> Result<(), PersistenceError> {
        self.0.delete(&format!("participant:{feed_id}:{member}"))
    }

    pub fn get_message(
        &self,
        message_id: FeedMessageId,
    ) -> Result<Option<FeedMessage>, PersistenceError> {
        self.0.get(&format!("message:{message_id}"))
    }

    /// Insert only if `message_id` has never been seen. Returns whether
    /// this call is the one that inserted it.
    pub fn insert_message_if_absent(
        &self,
        message: &FeedMessage,
    ) -> Result<bool, PersistenceError> {
        if self.get_message(message.feed_message_id)?.is_some() {
            return Ok(false);
        }
        self.0
            .put(&format!("message:{}", message.feed_message_id), message)?;
        Ok(true)
    }

    pub fn get_commitment(
        &self,
        feed_id: FeedId,
        user_commitment: [u8; 32],
    ) -> Result<Option<FeedMemberCommitment>, PersistenceError> {
        self.0
            .get(&format!("commitment:{feed_id}:{}", hex(&user_commitment)))
    }

    pub fn upsert_commitment(
        &self,
        commitment: &FeedMemberCommitment,
    ) -> Result<(), PersistenceError> {
        self.0.put(
            &format!(
                "commitment:{}:{}",
                commitment.feed_id,
                hex(&commitment.user_commitment)
            ),
            commitment,
        )
    }

    pub fn delete_commitment(
        &self,
        feed_id: FeedId,
        user_commitment: [u8; 32],
    ) -> Result<(), PersistenceError> {
        self.0
            .delete(&format!("commitment:{feed_id}:{}", hex(&user_commitment)))
    }

    pub fn list_commitments(
        &self,
        feed_id: FeedId,
    ) -> Result<Vec<FeedMemberCommitment>, PersistenceError> {
        self.0.scan(&format!("commitment:{feed_id}:"))
    }

    pub fn append_root_history(&self, root: &MerkleRootHistory) -> Result<(), PersistenceError> {
        self.0.put(
            &format!("root_history:{}:{:020}", root.feed_id, root.block_height),
            root,
        )
    }

    /// Up to the last `limit` Merkle roots for a feed, most recent first.
    pub fn latest_roots(
        &self,
        feed_id: FeedId,
        limit: usize,
    ) -> Result<Vec<MerkleRootHistory>, PersistenceError> {
        let mut roots: Vec<MerkleRootHistory> =
            self.0.scan(&format!("root_history:{feed_id}:"))?;
        roots.reverse();
        roots.truncate(limit);
        Ok(roots)
    }
}

pub struct ReactionsRepository<'a>(KvRepository<'a>);

impl<'a> ReactionsRepository<'a> {
    pub(crate) fn new(view: View<'a>) -> Self {
        Self(KvRepository::new(view, "reactions"))
    }

    pub fn get_nullifier(
        &self,
        nullifier: [u8; 32],
    ) -> Result<Option<ReactionNullifier>, PersistenceError> {
        self.0.get(&format!("nullifier:{}", hex(&nullifier)))
    }

    pub fn upsert_nullifier(&self, record: &ReactionNullifier) -> Result<(), PersistenceError> {
        self.0
            .put(&format!("nullifier:{}", hex(&record.nullifier)), record)
    }

    pub fn get_tally(
        &self,
        message_id: FeedMessageId,
    ) -> Result<Option<MessageReactionTally>, PersistenceError> {
        self.0.get(&format!("tally:{message_id}"))
    }

    pub fn upsert_tally(&self, tally: &MessageReactionTally) -> Result<(), PersistenceError> {
        self.0.put(&format!("tally:{}", tally.message_id), tally)
    }
}
