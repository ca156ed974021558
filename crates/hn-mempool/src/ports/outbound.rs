//! Outbound port the mempool drives, implemented downstream by `hn-idempotency`.

use async_trait::async_trait;
use hn_types::FeedMessageId;

/// Frees in-flight tracking for messages that have just left the pool.
///
/// `hn-mempool` owns this trait rather than depending on `hn-idempotency`
/// directly, since the gate needs to call back into the pool's `add` path
/// and a direct dependency in both directions would be circular.
#[async_trait]
pub trait IdempotencyTracker: Send + Sync {
    /// Remove the given message ids from the in-flight set. Called the
    /// instant their transactions leave the pool on drain, so a
    /// resubmission is accepted again only once it can no longer collide
    /// with the batch that just departed.
    async fn remove_from_tracking(&self, feed_message_ids: Vec<FeedMessageId>);
}
