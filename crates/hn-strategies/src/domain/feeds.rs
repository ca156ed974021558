//! Personal-feed, chat-feed, and feed-message strategies (§4.12).

use async_trait::async_trait;

use hn_persistence::{PersistenceError, PersistenceFacade};
use hn_registry::IndexStrategy;
use hn_types::payload::{NewChatFeedPayload, NewFeedMessagePayload, NewPersonalFeedPayload};
use hn_types::{
    BlockIndex, CoreError, Feed, FeedId, FeedMessage, FeedParticipant, FeedType, ParticipantType,
    PayloadKind, TransactionPayload, ValidatedTransaction,
};

fn persistence_err(e: PersistenceError) -> CoreError {
    CoreError::PersistenceUnavailable(e.to_string())
}

/// Creates a user's own personal feed. Rejects a structurally invalid
/// payload outright; otherwise creates the feed and its owner
/// participant atomically, only if the user has no personal feed yet.
pub struct NewPersonalFeedStrategy {
    persistence: PersistenceFacade,
}

impl NewPersonalFeedStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl IndexStrategy for NewPersonalFeedStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::NEW_PERSONAL_FEED
    }

    async fn handle(&self, tx: &ValidatedTransaction, block_index: BlockIndex) -> Result<(), CoreError> {
        let NewPersonalFeedPayload { feed_id, owner, encrypted_feed_key } = match tx.payload() {
            TransactionPayload::NewPersonalFeed(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a new-personal-feed payload".into())),
        };

        if *feed_id == FeedId::EMPTY || encrypted_feed_key.trim().is_empty() {
            return Err(CoreError::ValidationFailed(
                "new personal feed requires a non-empty feed id and encrypted key".into(),
            ));
        }

        let uow = self.persistence.create_writable();
        if uow.feeds().personal_feed_owner(owner).map_err(persistence_err)?.is_some() {
            uow.rollback().await;
            return Ok(());
        }

        uow.feeds()
            .upsert_feed(&Feed {
                feed_id: *feed_id,
                title: owner.to_string(),
                feed_type: FeedType::Personal,
                block_index,
                participants: vec![owner.clone()],
            })
            .map_err(persistence_err)?;
        uow.feeds()
            .upsert_participant(&FeedParticipant {
                feed_id: *feed_id,
                member_public_address: owner.clone(),
                participant_type: ParticipantType::Owner,
                encrypted_feed_key: encrypted_feed_key.clone(),
                key_generation: 0,
            })
            .map_err(persistence_err)?;
        uow.feeds()
            .mark_personal_feed_owner(owner, *feed_id)
            .map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)
    }
}

/// Creates a direct/chat feed between its participants. No payload in
/// the core names an explicit rejection condition, so the only
/// idempotence guard is "the feed id has been seen before".
pub struct NewChatFeedStrategy {
    persistence: PersistenceFacade,
}

impl NewChatFeedStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl IndexStrategy for NewChatFeedStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::NEW_CHAT_FEED
    }

    async fn handle(&self, tx: &ValidatedTransaction, block_index: BlockIndex) -> Result<(), CoreError> {
        let NewChatFeedPayload { feed_id, creator, participants, encrypted_feed_key } = match tx.payload() {
            TransactionPayload::NewChatFeed(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a new-chat-feed payload".into())),
        };

        let uow = self.persistence.create_writable();
        if uow.feeds().get_feed(*feed_id).map_err(persistence_err)?.is_some() {
            uow.rollback().await;
            return Ok(());
        }

        uow.feeds()
            .upsert_feed(&Feed {
                feed_id: *feed_id,
                title: String::new(),
                feed_type: FeedType::Chat,
                block_index,
                participants: participants.clone(),
            })
            .map_err(persistence_err)?;

        for member in participants {
            let participant_type = if member == creator {
                ParticipantType::Owner
            } else {
                ParticipantType::Member
            };
            uow.feeds()
                .upsert_participant(&FeedParticipant {
                    feed_id: *feed_id,
                    member_public_address: member.clone(),
                    participant_type,
                    encrypted_feed_key: encrypted_feed_key.clone(),
                    key_generation: 0,
                })
                .map_err(persistence_err)?;
        }
        uow.commit().await.map_err(persistence_err)
    }
}

/// Inserts a feed message keyed by `feed_message_id`; a duplicate key is
/// a no-op, which is the idempotence guarantee on replay.
pub struct NewFeedMessageStrategy {
    persistence: PersistenceFacade,
}

impl NewFeedMessageStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl IndexStrategy for NewFeedMessageStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::NEW_FEED_MESSAGE
    }

    async fn handle(&self, tx: &ValidatedTransaction, block_index: BlockIndex) -> Result<(), CoreError> {
        let NewFeedMessagePayload { feed_message_id, feed_id, issuer, content } = match tx.payload() {
            TransactionPayload::NewFeedMessage(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a new-feed-message payload".into())),
        };

        let uow = self.persistence.create_writable();
        let inserted = uow
            .feeds()
            .insert_message_if_absent(&FeedMessage {
                feed_message_id: *feed_message_id,
                feed_id: *feed_id,
                issuer_public_address: issuer.clone(),
                content: content.clone(),
                timestamp: hn_types::Timestamp::now(),
                block_index,
            })
            .map_err(persistence_err)?;

        if !inserted {
            uow.rollback().await;
            return Ok(());
        }
        uow.commit().await.map_err(persistence_err)
    }
}
