//! `HushMembership` (spec §6): commitment registration and root history.
//!
//! `RegisterCommitment` is a direct write of a [`FeedMemberCommitment`]
//! followed by publishing `FeedMembershipChanged`, the same event the
//! membership tree maintainer reacts to after a `JoinGroupFeed`/
//! `LeaveGroupFeed` transaction commits. It is deliberately a lighter
//! path than those transactions: it skips
//! `FeedParticipant` bookkeeping entirely, for registering a commitment
//! against a feed the caller already belongs to.
//!
//! `GetMembershipProof` reports inclusion against the *current* live
//! commitment set and most recent root rather than a positional Merkle
//! authentication path: the maintainer only persists roots, not a
//! per-root snapshot of the leaf set they were built from, so there is
//! no historical leaf-set to build a path against.

use std::sync::Arc;

use hn_bus::{EventPublisher, NodeEvent};
use hn_persistence::PersistenceFacade;
use hn_types::{CoreError, FeedMemberCommitment, MerkleRootHistory};

use super::wire;

/// Whether a commitment is currently a member of a feed's tree, and
/// against which root that was last checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipProof {
    pub included: bool,
    pub current_root: Option<[u8; 32]>,
}

pub struct MembershipHandler {
    persistence: PersistenceFacade,
    bus: Arc<dyn EventPublisher>,
}

impl MembershipHandler {
    #[must_use]
    pub fn new(persistence: PersistenceFacade, bus: Arc<dyn EventPublisher>) -> Self {
        Self { persistence, bus }
    }

    /// `GetRecentMerkleRoots({feedId, limit}) → Root[]`.
    pub fn get_recent_merkle_roots(
        &self,
        feed_id_bytes: &[u8],
        limit: usize,
    ) -> Result<Vec<MerkleRootHistory>, CoreError> {
        let feed_id = wire::parse_feed_id(feed_id_bytes)?;
        Ok(self
            .persistence
            .create_read_only()
            .feeds()
            .latest_roots(feed_id, limit)
            .unwrap_or_default())
    }

    /// `IsCommitmentRegistered({feedId, commitment}) → bool`.
    pub fn is_commitment_registered(
        &self,
        feed_id_bytes: &[u8],
        commitment_bytes: &[u8],
    ) -> Result<bool, CoreError> {
        let feed_id = wire::parse_feed_id(feed_id_bytes)?;
        let commitment = wire::parse_commitment(commitment_bytes)?;
        Ok(self
            .persistence
            .create_read_only()
            .feeds()
            .get_commitment(feed_id, commitment)
            .ok()
            .flatten()
            .is_some())
    }

    /// `GetMembershipProof({feedId, commitment}) → MembershipProof`.
    pub fn get_membership_proof(
        &self,
        feed_id_bytes: &[u8],
        commitment_bytes: &[u8],
    ) -> Result<MembershipProof, CoreError> {
        let feed_id = wire::parse_feed_id(feed_id_bytes)?;
        let commitment = wire::parse_commitment(commitment_bytes)?;
        let uow = self.persistence.create_read_only();

        let included = uow
            .feeds()
            .get_commitment(feed_id, commitment)
            .ok()
            .flatten()
            .is_some();
        let current_root = uow
            .feeds()
            .latest_roots(feed_id, 1)
            .ok()
            .and_then(|roots| roots.into_iter().next())
            .map(|root| root.merkle_root);

        Ok(MembershipProof { included, current_root })
    }

    /// `RegisterCommitment({feedId, commitment})`.
    ///
    /// Upserts the commitment row and publishes `FeedMembershipChanged`;
    /// the root itself is recomputed asynchronously by the maintainer.
    pub async fn register_commitment(
        &self,
        feed_id_bytes: &[u8],
        commitment_bytes: &[u8],
    ) -> Result<(), CoreError> {
        let feed_id = wire::parse_feed_id(feed_id_bytes)?;
        let user_commitment = wire::parse_commitment(commitment_bytes)?;

        let uow = self.persistence.create_writable();
        uow.feeds()
            .upsert_commitment(&FeedMemberCommitment { feed_id, user_commitment })
            .map_err(|e| CoreError::PersistenceUnavailable(e.to_string()))?;
        uow.commit()
            .await
            .map_err(|e| CoreError::PersistenceUnavailable(e.to_string()))?;

        self.bus.publish(NodeEvent::FeedMembershipChanged { feed_id }).await;
        Ok(())
    }
}
