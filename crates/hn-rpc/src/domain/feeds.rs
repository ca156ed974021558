//! `HushFeeds` (spec §6): feed creation, membership, and messaging.
//!
//! Every write — create feed, send message, join, leave — is a signed
//! transaction routed through the same [`TransactionIngress`] as
//! `HushBlockchain.SubmitSignedTransaction`; spec §6 names these as
//! distinct methods purely for client ergonomics. `ListFeeds` is the one
//! pure read in this surface.

use std::sync::Arc;

use hn_persistence::PersistenceFacade;
use hn_types::{Feed, PublicAddress};

use super::ingress::{SubmitTransactionResponse, TransactionIngress};

pub struct FeedsHandler {
    ingress: Arc<TransactionIngress>,
    persistence: PersistenceFacade,
}

impl FeedsHandler {
    #[must_use]
    pub fn new(ingress: Arc<TransactionIngress>, persistence: PersistenceFacade) -> Self {
        Self { ingress, persistence }
    }

    /// Create, send-message, join, or leave: all four submit the same way.
    pub async fn submit(&self, bytes: &[u8]) -> SubmitTransactionResponse {
        self.ingress.submit(bytes).await
    }

    /// `ListFeeds({member}) → Feed[]`: every feed `member` participates in.
    #[must_use]
    pub fn list_feeds(&self, member: &PublicAddress) -> Vec<Feed> {
        self.persistence
            .create_read_only()
            .feeds()
            .list_feeds()
            .unwrap_or_default()
            .into_iter()
            .filter(|feed| feed.participants.contains(member))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_idempotency::IdempotencyGate;
    use hn_mempool::Mempool;
    use hn_registry::TransactionRegistry;
    use hn_types::{BlockIndex, FeedId, FeedType};

    fn feed(id: FeedId, participants: Vec<PublicAddress>) -> Feed {
        Feed {
            feed_id: id,
            title: "chat".into(),
            feed_type: FeedType::Chat,
            block_index: BlockIndex::GENESIS,
            participants,
        }
    }

    #[tokio::test]
    async fn list_feeds_returns_only_feeds_the_member_participates_in() {
        let persistence = PersistenceFacade::new();
        let alice = PublicAddress("alice".into());
        let bob = PublicAddress("bob".into());

        let uow = persistence.create_writable();
        uow.feeds().upsert_feed(&feed(FeedId::new(), vec![alice.clone()])).unwrap();
        uow.feeds().upsert_feed(&feed(FeedId::new(), vec![bob.clone()])).unwrap();
        uow.commit().await.unwrap();

        let idempotency = Arc::new(IdempotencyGate::new(persistence.clone()));
        let mempool = Arc::new(Mempool::new(idempotency.clone()));
        let ingress = Arc::new(TransactionIngress::new(Arc::new(TransactionRegistry::new()), idempotency, mempool));
        let handler = FeedsHandler::new(ingress, persistence);

        assert_eq!(handler.list_feeds(&alice).len(), 1);
        assert_eq!(handler.list_feeds(&bob).len(), 1);
        assert!(handler.list_feeds(&PublicAddress("carol".into())).is_empty());
    }
}
