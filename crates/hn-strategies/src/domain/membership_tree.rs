//! Membership Merkle-root maintainer (§4).
//!
//! Reacts to `FeedMembershipChanged` by recomputing a feed's registered
//! commitments into a fresh Merkle root and appending it to that feed's
//! history. A reaction submission's grace-window check and a join
//! validator's "commitment is in a recent root" check both read what
//! this produces; nothing else writes `MerkleRootHistory`.

use std::sync::Arc;

use tracing::error;

use hn_bus::{EventFilter, EventTopic, InMemoryEventBus, NodeEvent};
use hn_cache::BlockchainCache;
use hn_crypto::blake3_hash;
use hn_persistence::{PersistenceError, PersistenceFacade};
use hn_types::{CoreError, FeedId, MerkleRootHistory, Timestamp};

fn persistence_err(e: PersistenceError) -> CoreError {
    CoreError::PersistenceUnavailable(e.to_string())
}

/// Root of a balanced binary hash tree over a feed's registered
/// commitments, zero-padded to an even width at every layer.
///
/// Leaves are sorted first so the root only depends on the current
/// membership set, not the order commitments were registered in.
fn merkle_root(mut leaves: Vec<[u8; 32]>) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    leaves.sort_unstable();

    let mut layer = leaves.split_off(0);
    while layer.len() > 1 {
        if layer.len() % 2 == 1 {
            layer.push([0u8; 32]);
        }
        layer = layer
            .chunks(2)
            .map(|pair| {
                let mut buf = [0u8; 64];
                buf[..32].copy_from_slice(&pair[0]);
                buf[32..].copy_from_slice(&pair[1]);
                blake3_hash(&buf)
            })
            .collect();
    }
    layer[0]
}

pub struct MembershipTreeMaintainer {
    persistence: PersistenceFacade,
    cache: Arc<BlockchainCache>,
    bus: Arc<InMemoryEventBus>,
}

impl MembershipTreeMaintainer {
    #[must_use]
    pub fn new(persistence: PersistenceFacade, cache: Arc<BlockchainCache>, bus: Arc<InMemoryEventBus>) -> Self {
        Self { persistence, cache, bus }
    }

    pub async fn run(&self) {
        let mut sub = self.bus.subscribe(EventFilter::topics(vec![EventTopic::Membership]));
        while let Some(event) = sub.recv().await {
            if let NodeEvent::FeedMembershipChanged { feed_id } = event {
                if let Err(err) = self.recompute(feed_id).await {
                    error!(%err, %feed_id, "failed to recompute membership merkle root");
                }
            }
        }
    }

    pub async fn recompute(&self, feed_id: FeedId) -> Result<(), CoreError> {
        let uow = self.persistence.create_writable();
        let leaves = uow
            .feeds()
            .list_commitments(feed_id)
            .map_err(persistence_err)?
            .into_iter()
            .map(|c| c.user_commitment)
            .collect();

        let root = MerkleRootHistory {
            feed_id,
            merkle_root: merkle_root(leaves),
            block_height: self.cache.last_block_index().0.max(0) as u64,
            created_at: Timestamp::now(),
        };
        uow.feeds().append_root_history(&root).map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)
    }
}
