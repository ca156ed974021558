//! Reaction indexing strategy (§4.12.1): the hardest strategy — a
//! nullifier-deduplicated, homomorphically-combined tally update.

use async_trait::async_trait;
use tokio::sync::Mutex;

use hn_crypto::reaction::{combine, replace};
use hn_crypto::CryptoError;
use hn_persistence::{PersistenceError, PersistenceFacade};
use hn_registry::IndexStrategy;
use hn_types::payload::NewReactionPayload;
use hn_types::{
    BlockIndex, CoreError, MessageReactionTally, PayloadKind, ReactionNullifier, Timestamp,
    TransactionPayload, ValidatedTransaction,
};

fn persistence_err(e: PersistenceError) -> CoreError {
    CoreError::PersistenceUnavailable(e.to_string())
}

fn crypto_err(e: CryptoError) -> CoreError {
    CoreError::IndexingFailed(e.to_string())
}

/// Projects an accepted `NewReactionPayload` onto a message's running
/// tally, deduplicating by nullifier.
///
/// The underlying store has no native primary-key constraint to detect
/// a racing insert against, so rather than the optimistic
/// read-then-retry the contract describes, every call serializes
/// through one mutex — the same discipline `hn-block-assembler` uses
/// for its own commit lock — which gives the identical FIRST_VOTE
/// xor UPDATE_VOTE guarantee without needing a conflict to recover
/// from in the first place.
pub struct ReactionStrategy {
    persistence: PersistenceFacade,
    lock: Mutex<()>,
}

impl ReactionStrategy {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self {
            persistence,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl IndexStrategy for ReactionStrategy {
    fn can_handle(&self, kind: PayloadKind) -> bool {
        kind == PayloadKind::NEW_REACTION
    }

    async fn handle(&self, tx: &ValidatedTransaction, _block_index: BlockIndex) -> Result<(), CoreError> {
        let payload = match tx.payload() {
            TransactionPayload::NewReaction(payload) => payload,
            _ => return Err(CoreError::UnknownPayloadKind("expected a new-reaction payload".into())),
        };

        let _guard = self.lock.lock().await;
        let uow = self.persistence.create_writable();

        let existing = uow.reactions().get_nullifier(payload.nullifier).map_err(persistence_err)?;
        let mut tally = uow
            .reactions()
            .get_tally(payload.message_id)
            .map_err(persistence_err)?
            .unwrap_or_else(|| MessageReactionTally::zero(payload.message_id, payload.feed_id));

        let vote_quad = (
            payload.vote_c1x.as_slice(),
            payload.vote_c1y.as_slice(),
            payload.vote_c2x.as_slice(),
            payload.vote_c2y.as_slice(),
        );
        let tally_quad = (
            tally.tally_c1x.as_slice(),
            tally.tally_c1y.as_slice(),
            tally.tally_c2x.as_slice(),
            tally.tally_c2y.as_slice(),
        );

        let now = Timestamp::now();
        let (combined, nullifier_record) = match existing {
            None => {
                let combined = combine(tally_quad, vote_quad).map_err(crypto_err)?;
                tally.total_count += 1;
                let record = ReactionNullifier {
                    nullifier: payload.nullifier,
                    message_id: payload.message_id,
                    vote_c1x: payload.vote_c1x.clone(),
                    vote_c1y: payload.vote_c1y.clone(),
                    vote_c2x: payload.vote_c2x.clone(),
                    vote_c2y: payload.vote_c2y.clone(),
                    encrypted_backup: payload.encrypted_backup.clone(),
                    created_at: now,
                    updated_at: now,
                };
                (combined, record)
            }
            Some(old) => {
                let old_vote_quad = (
                    old.vote_c1x.as_slice(),
                    old.vote_c1y.as_slice(),
                    old.vote_c2x.as_slice(),
                    old.vote_c2y.as_slice(),
                );
                let combined = replace(tally_quad, old_vote_quad, vote_quad).map_err(crypto_err)?;
                let record = ReactionNullifier {
                    nullifier: payload.nullifier,
                    message_id: payload.message_id,
                    vote_c1x: payload.vote_c1x.clone(),
                    vote_c1y: payload.vote_c1y.clone(),
                    vote_c2x: payload.vote_c2x.clone(),
                    vote_c2y: payload.vote_c2y.clone(),
                    encrypted_backup: payload.encrypted_backup.clone(),
                    created_at: old.created_at,
                    updated_at: now,
                };
                (combined, record)
            }
        };

        tally.tally_c1x = combined.0;
        tally.tally_c1y = combined.1;
        tally.tally_c2x = combined.2;
        tally.tally_c2y = combined.3;
        tally.version += 1;

        uow.reactions().upsert_tally(&tally).map_err(persistence_err)?;
        uow.reactions().upsert_nullifier(&nullifier_record).map_err(persistence_err)?;
        uow.commit().await.map_err(persistence_err)
    }
}
