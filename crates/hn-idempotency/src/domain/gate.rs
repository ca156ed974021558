//! The gate itself.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{error, warn};

use hn_mempool::IdempotencyTracker;
use hn_persistence::PersistenceFacade;
use hn_types::FeedMessageId;

use super::entities::CheckOutcome;

/// Dedup gate: an in-flight set plus a fallback lookup against the
/// committed feed-message repository.
///
/// `check` → `try_track` → `Mempool::add` is the critical section
/// against duplicates; `try_track`'s atomic insert-if-absent is the
/// linearization point. A duplicate submitted between `check` and
/// `try_track` by a racing caller loses the `try_track` race and is
/// reported as `Pending`.
pub struct IdempotencyGate {
    in_flight: RwLock<HashSet<FeedMessageId>>,
    persistence: PersistenceFacade,
}

impl IdempotencyGate {
    /// Build a gate with an empty in-flight set over the given persistence façade.
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self {
            in_flight: RwLock::new(HashSet::new()),
            persistence,
        }
    }

    /// Check whether `id` can be admitted.
    ///
    /// Does not itself install anything into the in-flight set — that
    /// is [`try_track`](Self::try_track)'s job, kept separate so a
    /// caller can run other pre-commit validation between the two
    /// without holding a write lock the whole time.
    pub fn check(&self, id: FeedMessageId) -> CheckOutcome {
        if self.in_flight.read().contains(&id) {
            return CheckOutcome::Pending;
        }

        let uow = self.persistence.create_read_only();
        match uow.feeds().get_message(id) {
            Ok(Some(_)) => CheckOutcome::AlreadyExists,
            Ok(None) => CheckOutcome::Accepted,
            Err(err) => {
                error!(error = %err, feed_message_id = %id, "idempotency gate failing closed on storage error");
                CheckOutcome::Rejected
            }
        }
    }

    /// Atomic insert-if-absent. `true` iff this call installed `id`.
    pub fn try_track(&self, id: FeedMessageId) -> bool {
        self.in_flight.write().insert(id)
    }

    /// Number of ids currently tracked as in-flight.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.read().len()
    }
}

#[async_trait]
impl IdempotencyTracker for IdempotencyGate {
    async fn remove_from_tracking(&self, feed_message_ids: Vec<FeedMessageId>) {
        let mut guard = self.in_flight.write();
        for id in feed_message_ids {
            if !guard.remove(&id) {
                warn!(feed_message_id = %id, "drained feed message was not tracked as in-flight");
            }
        }
    }
}
