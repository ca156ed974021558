//! Group-feed membership strategies (§4.12).
//!
//! `MemberBannedStrategy`/`MemberUnbannedStrategy` are named in the
//! contract alongside join/leave, but no payload kind represents a ban
//! or unban transaction in this model — moderation in this node happens
//! out of band of the transaction log, so those two have no strategy
//! here. Join and leave both maintain `FeedMemberCommitment` and
//! publish `FeedMembershipChanged`, which is what the Merkle-root
//! history maintainer reacts to.

use std::sync::Arc;

use async_trait::async_trait;

use hn_bus::{EventPublisher, NodeEvent};
use hn_persistence::{PersistenceError, PersistenceFacade};
use hn_registry::IndexStrategy;
use hn_types::payload::{JoinGroupFeedPayload, LeaveGroupFeedPayload};
use hn_types::{
    BlockIndex, CoreError, FeedMemberCommitment, FeedParticipant, ParticipantType, PayloadKind,
    TransactionPayload, ValidatedTransaction,
};

fn persistence_err(e: PersistenceError) -> CoreError {
    CoreError::PersistenceUnavailable(e.to_string())
}

/// Registers a member's commitment and participant row; re-joining with
/// the same commitment is a no-op.
pub struct JoinGroupFeedStrategy {
    persistence: PersistenceFacade,
    bus: Arc<dyn EventPublisher>,
}

impl JoinGroupFeedStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade, bus: Arc<dyn EventPublisher>) -> Self {
        Self { persistence, bus }
    }
}

#[async_trait]
impl IndexStrategy for JoinGroupFeedStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::JOIN_GROUP_FEED
    }

    async fn handle(&self, tx: &ValidatedTransaction, _block_index: BlockIndex) -> Result<(), CoreError> {
        let JoinGroupFeedPayload {
            feed_id,
            member,
            user_commitment,
            encrypted_feed_key,
            key_generation,
        } = match tx.payload() {
            TransactionPayload::JoinGroupFeed(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a join-group-feed payload".into())),
        };

        let uow = self.persistence.create_writable();
        if uow
            .feeds()
            .get_commitment(*feed_id, *user_commitment)
            .map_err(persistence_err)?
            .is_some()
        {
            uow.rollback().await;
            return Ok(());
        }

        uow.feeds()
            .upsert_participant(&FeedParticipant {
                feed_id: *feed_id,
                member_public_address: member.clone(),
                participant_type: ParticipantType::Member,
                encrypted_feed_key: encrypted_feed_key.clone(),
                key_generation: *key_generation,
            })
            .map_err(persistence_err)?;
        uow.feeds()
            .upsert_commitment(&FeedMemberCommitment {
                feed_id: *feed_id,
                user_commitment: *user_commitment,
            })
            .map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)?;

        self.bus
            .publish(NodeEvent::FeedMembershipChanged { feed_id: *feed_id })
            .await;
        Ok(())
    }
}

/// Removes a member's participant row; an already-absent member is a no-op.
pub struct LeaveGroupFeedStrategy {
    persistence: PersistenceFacade,
    bus: Arc<dyn EventPublisher>,
}

impl LeaveGroupFeedStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade, bus: Arc<dyn EventPublisher>) -> Self {
        Self { persistence, bus }
    }
}

#[async_trait]
impl IndexStrategy for LeaveGroupFeedStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::LEAVE_GROUP_FEED
    }

    async fn handle(&self, tx: &ValidatedTransaction, _block_index: BlockIndex) -> Result<(), CoreError> {
        let LeaveGroupFeedPayload { feed_id, member } = match tx.payload() {
            TransactionPayload::LeaveGroupFeed(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a leave-group-feed payload".into())),
        };

        let uow = self.persistence.create_writable();
        if uow.feeds().get_participant(*feed_id, member).map_err(persistence_err)?.is_none() {
            uow.rollback().await;
            return Ok(());
        }

        uow.feeds().delete_participant(*feed_id, member).map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)?;

        self.bus
            .publish(NodeEvent::FeedMembershipChanged { feed_id: *feed_id })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_bus::{EventFilter, EventTopic, InMemoryEventBus};
    use hn_types::{FeedId, SignatureInfo, SignedTransaction, UnsignedTransaction};

    fn wrap(payload: TransactionPayload, address: &str) -> ValidatedTransaction {
        let unsigned = UnsignedTransaction::new(payload).unwrap();
        let signed = SignedTransaction {
            unsigned,
            user_signature: SignatureInfo {
                signatory_public_address: address.into(),
                signature: vec![],
            },
        };
        ValidatedTransaction {
            signed,
            validator_signature: SignatureInfo {
                signatory_public_address: "validator".into(),
                signature: vec![],
            },
        }
    }

    fn join_tx(feed_id: FeedId, member: &str, commitment: [u8; 32]) -> ValidatedTransaction {
        wrap(
            TransactionPayload::JoinGroupFeed(JoinGroupFeedPayload {
                feed_id,
                member: member.into(),
                user_commitment: commitment,
                encrypted_feed_key: "key".into(),
                key_generation: 0,
            }),
            member,
        )
    }

    fn leave_tx(feed_id: FeedId, member: &str) -> ValidatedTransaction {
        wrap(
            TransactionPayload::LeaveGroupFeed(LeaveGroupFeedPayload { feed_id, member: member.into() }),
            member,
        )
    }

    #[tokio::test]
    async fn join_registers_participant_and_commitment_and_publishes() {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Membership]));
        let strategy = JoinGroupFeedStrategy::new(persistence.clone(), Arc::clone(&bus) as Arc<dyn EventPublisher>);
        let feed_id = FeedId::new();

        strategy.handle(&join_tx(feed_id, "alice", [1u8; 32]), BlockIndex::GENESIS).await.unwrap();

        let uow = persistence.create_read_only();
        assert!(uow.feeds().get_participant(feed_id, &"alice".into()).unwrap().is_some());
        assert!(uow.feeds().get_commitment(feed_id, [1u8; 32]).unwrap().is_some());
        assert!(matches!(sub.recv().await.unwrap(), NodeEvent::FeedMembershipChanged { .. }));
    }

    #[tokio::test]
    async fn rejoining_with_the_same_commitment_is_a_no_op() {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let strategy = JoinGroupFeedStrategy::new(persistence.clone(), bus as Arc<dyn EventPublisher>);
        let feed_id = FeedId::new();
        let tx = join_tx(feed_id, "alice", [2u8; 32]);

        strategy.handle(&tx, BlockIndex::GENESIS).await.unwrap();
        strategy.handle(&tx, BlockIndex::GENESIS).await.unwrap();

        let uow = persistence.create_read_only();
        assert!(uow.feeds().get_commitment(feed_id, [2u8; 32]).unwrap().is_some());
    }

    #[tokio::test]
    async fn leave_removes_the_participant_row_and_publishes() {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Membership]));
        let feed_id = FeedId::new();

        JoinGroupFeedStrategy::new(persistence.clone(), Arc::clone(&bus) as Arc<dyn EventPublisher>)
            .handle(&join_tx(feed_id, "alice", [3u8; 32]), BlockIndex::GENESIS)
            .await
            .unwrap();
        sub.recv().await.unwrap();

        LeaveGroupFeedStrategy::new(persistence.clone(), Arc::clone(&bus) as Arc<dyn EventPublisher>)
            .handle(&leave_tx(feed_id, "alice"), BlockIndex::GENESIS.next())
            .await
            .unwrap();

        let uow = persistence.create_read_only();
        assert!(uow.feeds().get_participant(feed_id, &"alice".into()).unwrap().is_none());
        assert!(matches!(sub.recv().await.unwrap(), NodeEvent::FeedMembershipChanged { .. }));
    }

    #[tokio::test]
    async fn leaving_a_feed_you_never_joined_is_a_no_op() {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let strategy = LeaveGroupFeedStrategy::new(persistence.clone(), bus as Arc<dyn EventPublisher>);

        strategy.handle(&leave_tx(FeedId::new(), "ghost"), BlockIndex::GENESIS).await.unwrap();
    }
}
