//! Startup sequence (§4.9): find or build genesis, then unblock the
//! scheduler.

use hn_bus::{EventPublisher, NodeEvent};
use hn_block_assembler::BlockAssembler;
use hn_persistence::PersistenceFacade;
use hn_types::{BlockId, BlockchainState, BlockchainStateId, CoreError};
use std::sync::Arc;
use tracing::info;

/// Reads chain state on startup, builds genesis if none exists, and
/// publishes `BlockchainInitialized` either way.
pub struct ChainFoundation {
    persistence: PersistenceFacade,
    assembler: Arc<BlockAssembler>,
    bus: Arc<dyn EventPublisher>,
    blockchain_state_id: BlockchainStateId,
}

impl ChainFoundation {
    #[must_use]
    pub fn new(
        persistence: PersistenceFacade,
        assembler: Arc<BlockAssembler>,
        bus: Arc<dyn EventPublisher>,
        blockchain_state_id: BlockchainStateId,
    ) -> Self {
        Self {
            persistence,
            assembler,
            bus,
            blockchain_state_id,
        }
    }

    /// Run the three-step startup sequence.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        let existing = {
            let uow = self.persistence.create_read_only();
            uow.blockchain()
                .get_blockchain_state()
                .map_err(|e| CoreError::PersistenceUnavailable(format!("chain state lookup failed: {e}")))?
        };

        match existing {
            Some(state) => {
                info!(block_index = %state.block_index, "existing chain state found, skipping genesis");
            }
            None => {
                info!("no chain state found, assembling genesis block");
                let genesis_state =
                    BlockchainState::genesis(self.blockchain_state_id, BlockId::new(), BlockId::new());
                self.assembler.assemble_genesis(genesis_state).await?;
            }
        }

        self.bus.publish(NodeEvent::BlockchainInitialized).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_bus::{EventFilter, InMemoryEventBus};
    use hn_cache::BlockchainCache;
    use hn_crypto::Ed25519KeyPair;
    use hn_types::BlockIndex;

    fn foundation() -> (ChainFoundation, PersistenceFacade, Arc<InMemoryEventBus>) {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let assembler = Arc::new(BlockAssembler::new(
            Arc::new(BlockchainCache::new()),
            persistence.clone(),
            Arc::clone(&bus) as Arc<dyn EventPublisher>,
            Arc::new(Ed25519KeyPair::generate()),
            BlockchainStateId::new(),
        ));
        let foundation = ChainFoundation::new(
            persistence.clone(),
            assembler,
            Arc::clone(&bus) as Arc<dyn EventPublisher>,
            BlockchainStateId::new(),
        );
        (foundation, persistence, bus)
    }

    #[tokio::test]
    async fn absent_state_triggers_genesis_assembly() {
        let (foundation, persistence, _bus) = foundation();

        foundation.initialize().await.unwrap();

        let uow = persistence.create_read_only();
        let state = uow.blockchain().get_blockchain_state().unwrap().unwrap();
        assert_eq!(state.block_index, BlockIndex::GENESIS);
    }

    #[tokio::test]
    async fn existing_state_is_left_untouched() {
        let (foundation, persistence, _bus) = foundation();
        let seeded = BlockchainState::genesis(BlockchainStateId::new(), BlockId::new(), BlockId::new());
        let uow = persistence.create_writable();
        uow.blockchain().upsert_blockchain_state(&seeded).unwrap();
        uow.commit().await.unwrap();

        foundation.initialize().await.unwrap();

        let uow = persistence.create_read_only();
        let state = uow.blockchain().get_blockchain_state().unwrap().unwrap();
        assert_eq!(state, seeded);
    }

    #[tokio::test]
    async fn initialize_always_publishes_blockchain_initialized() {
        let (foundation, _persistence, bus) = foundation();
        let mut sub = bus.subscribe(EventFilter::all());

        foundation.initialize().await.unwrap();

        let event = sub.recv().await.unwrap();
        assert!(matches!(event, NodeEvent::BlockchainInitialized));
    }
}
