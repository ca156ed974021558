//! The pool itself: a concurrent bag of validated transactions.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use hn_types::{TransactionPayload, ValidatedTransaction};

use crate::ports::IdempotencyTracker;

/// Default batch size for [`Mempool::drain`] when the caller doesn't name one.
pub const DEFAULT_DRAIN_MAX: usize = 1000;

/// Concurrent, unordered holding pen for transactions awaiting inclusion
/// in the next block.
///
/// `add` is synchronous and never blocks beyond the short-lived lock
/// acquisition; `drain` is `async` purely so it can hand drained
/// `NewFeedMessage` ids back to the idempotency gate before returning.
pub struct Mempool {
    transactions: Mutex<VecDeque<ValidatedTransaction>>,
    idempotency: Arc<dyn IdempotencyTracker>,
}

impl Mempool {
    /// Build an empty mempool wired to the idempotency gate it must notify on drain.
    pub fn new(idempotency: Arc<dyn IdempotencyTracker>) -> Self {
        Self {
            transactions: Mutex::new(VecDeque::new()),
            idempotency,
        }
    }

    /// Currently a no-op: the pool starts empty and needs no recovery step.
    pub async fn initialize(&self) {}

    /// Add a validated transaction. O(1), thread-safe, never blocks.
    pub fn add(&self, transaction: ValidatedTransaction) {
        let mut guard = self.transactions.lock();
        guard.push_back(transaction);
        hn_telemetry::TRANSACTIONS_RECEIVED.inc();
        hn_telemetry::MEMPOOL_SIZE.set(guard.len() as f64);
    }

    /// Number of transactions currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.lock().len()
    }

    /// True if the pool holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.lock().is_empty()
    }

    /// Remove and return up to `max_n` transactions in arbitrary order
    /// (no fairness guarantee), defaulting to [`DEFAULT_DRAIN_MAX`].
    ///
    /// Any drained `NewFeedMessage` transactions have their message ids
    /// released from the idempotency gate's in-flight set before this
    /// call returns, so a resubmission can never observe a window where
    /// the transaction has left the pool but is still tracked as in-flight.
    pub async fn drain(&self, max_n: Option<usize>) -> Vec<ValidatedTransaction> {
        let max_n = max_n.unwrap_or(DEFAULT_DRAIN_MAX);
        let drained: Vec<ValidatedTransaction> = {
            let mut guard = self.transactions.lock();
            let take = max_n.min(guard.len());
            guard.drain(..take).collect()
        };
        hn_telemetry::MEMPOOL_SIZE.set(self.len() as f64);

        let message_ids: Vec<_> = drained
            .iter()
            .filter_map(|tx| match tx.payload() {
                TransactionPayload::NewFeedMessage(payload) => Some(payload.feed_message_id),
                _ => None,
            })
            .collect();

        if !message_ids.is_empty() {
            debug!(count = message_ids.len(), "releasing drained feed messages from idempotency tracking");
            self.idempotency.remove_from_tracking(message_ids).await;
        }

        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hn_types::payload::{NewFeedMessagePayload, RewardPayload};
    use hn_types::{
        FeedId, FeedMessageId, SignatureInfo, SignedTransaction, UnsignedTransaction,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingTracker {
        released: Mutex<Vec<FeedMessageId>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdempotencyTracker for RecordingTracker {
        async fn remove_from_tracking(&self, feed_message_ids: Vec<FeedMessageId>) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.released.lock().extend(feed_message_ids);
        }
    }

    fn sig() -> SignatureInfo {
        SignatureInfo {
            signatory_public_address: "addr".into(),
            signature: vec![1, 2, 3],
        }
    }

    fn validated(payload: TransactionPayload) -> ValidatedTransaction {
        let unsigned = UnsignedTransaction::new(payload).unwrap();
        let signed = SignedTransaction {
            unsigned,
            user_signature: sig(),
        };
        ValidatedTransaction {
            signed,
            validator_signature: sig(),
        }
    }

    fn reward_tx() -> ValidatedTransaction {
        validated(TransactionPayload::Reward(RewardPayload {
            issuer: "producer".into(),
            token: "HUSH".into(),
            amount: "1".into(),
        }))
    }

    fn feed_message_tx() -> (FeedMessageId, ValidatedTransaction) {
        let feed_message_id = FeedMessageId::new();
        let tx = validated(TransactionPayload::NewFeedMessage(NewFeedMessagePayload {
            feed_message_id,
            feed_id: FeedId::new(),
            issuer: "alice".into(),
            content: "hi".into(),
        }));
        (feed_message_id, tx)
    }

    #[tokio::test]
    async fn add_then_drain_round_trips() {
        let pool = Mempool::new(Arc::new(RecordingTracker::default()));
        pool.add(reward_tx());
        assert_eq!(pool.len(), 1);

        let drained = pool.drain(None).await;
        assert_eq!(drained.len(), 1);
        assert!(pool.is_empty());
    }

    #[tokio::test]
    async fn drain_respects_max_n() {
        let pool = Mempool::new(Arc::new(RecordingTracker::default()));
        for _ in 0..5 {
            pool.add(reward_tx());
        }

        let first = pool.drain(Some(3)).await;
        assert_eq!(first.len(), 3);
        assert_eq!(pool.len(), 2);

        let second = pool.drain(Some(3)).await;
        assert_eq!(second.len(), 2);
        assert!(pool.is_empty());
    }

    #[tokio::test]
    async fn drain_releases_feed_message_ids_from_idempotency_tracking() {
        let tracker = Arc::new(RecordingTracker::default());
        let pool = Mempool::new(tracker.clone());

        let (id, tx) = feed_message_tx();
        pool.add(tx);
        pool.add(reward_tx());

        let drained = pool.drain(None).await;
        assert_eq!(drained.len(), 2);
        assert_eq!(tracker.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*tracker.released.lock(), vec![id]);
    }

    #[tokio::test]
    async fn drain_does_not_call_tracker_when_no_feed_messages_drained() {
        let tracker = Arc::new(RecordingTracker::default());
        let pool = Mempool::new(tracker.clone());
        pool.add(reward_tx());

        pool.drain(None).await;
        assert_eq!(tracker.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn initialize_is_a_no_op() {
        let pool = Mempool::new(Arc::new(RecordingTracker::default()));
        pool.initialize().await;
        assert!(pool.is_empty());
    }
}
