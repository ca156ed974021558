//! `HushReactions` (spec §6): anonymous-reaction tallies and nullifiers.

use hn_persistence::PersistenceFacade;
use hn_types::{CoreError, FeedMessageId, MessageReactionTally};

use super::wire;

pub struct ReactionsHandler {
    persistence: PersistenceFacade,
}

impl ReactionsHandler {
    #[must_use]
    pub fn new(persistence: PersistenceFacade) -> Self {
        Self { persistence }
    }

    /// `GetReactionTallies({feedId, messageIds[]}) → MessageTally[]`.
    ///
    /// A message with no recorded tally yet reports an all-zero one
    /// rather than being omitted.
    pub fn get_reaction_tallies(
        &self,
        feed_id_bytes: &[u8],
        message_id_bytes: &[&[u8]],
    ) -> Result<Vec<MessageReactionTally>, CoreError> {
        let feed_id = wire::parse_feed_id(feed_id_bytes)?;
        let uow = self.persistence.create_read_only();
        let reactions = uow.reactions();

        message_id_bytes
            .iter()
            .map(|bytes| {
                let message_id = wire::parse_message_id(bytes)?;
                Ok(reactions
                    .get_tally(message_id)
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| MessageReactionTally::zero(message_id, feed_id)))
            })
            .collect()
    }

    /// `NullifierExists({nullifier}) → bool`.
    pub fn nullifier_exists(&self, nullifier_bytes: &[u8]) -> Result<bool, CoreError> {
        let nullifier = wire::parse_nullifier(nullifier_bytes)?;
        Ok(self
            .persistence
            .create_read_only()
            .reactions()
            .get_nullifier(nullifier)
            .ok()
            .flatten()
            .is_some())
    }

    /// `GetReactionBackup({nullifier}) → bytes?`.
    pub fn get_reaction_backup(&self, nullifier_bytes: &[u8]) -> Result<Option<Vec<u8>>, CoreError> {
        let nullifier = wire::parse_nullifier(nullifier_bytes)?;
        Ok(self
            .persistence
            .create_read_only()
            .reactions()
            .get_nullifier(nullifier)
            .ok()
            .flatten()
            .and_then(|record| record.encrypted_backup))
    }
}
