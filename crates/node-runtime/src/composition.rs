//! Wires every `hn-*` crate into one running node.
//!
//! Construction order matters only where a later component borrows an
//! `Arc` built earlier; there is no phased startup beyond what
//! [`hn_chain_foundation::ChainFoundation`] already does internally.

use std::sync::Arc;

use hn_bus::{EventPublisher, InMemoryEventBus};
use hn_cache::BlockchainCache;
use hn_chain_foundation::ChainFoundation;
use hn_crypto::Ed25519KeyPair;
use hn_idempotency::IdempotencyGate;
use hn_mempool::Mempool;
use hn_persistence::PersistenceFacade;
use hn_registry::{RegistryEntry, TransactionRegistry};
use hn_rpc::{BankHandler, BlockchainHandler, FeedsHandler, IdentityHandler, MembershipHandler, ReactionsHandler, TransactionIngress};
use hn_scheduler::Scheduler;
use hn_strategies::{
    FullIdentityStrategy, JoinGroupFeedStrategy, LeaveGroupFeedStrategy, MembershipTreeMaintainer,
    NewChatFeedStrategy, NewFeedMessageStrategy, NewPersonalFeedStrategy, ReactionStrategy,
    RewardStrategy, SendFundsStrategy, UpdateIdentityStrategy,
};
use hn_types::{BlockchainStateId, PayloadKind};
use hn_validators::{ReactionValidator, StructuralSignatureValidator};
use hn_zk::ToyCircuitVerifier;

use crate::config::NodeConfig;

/// Every long-lived handle the composition root hands out, either to
/// `main`'s spawned tasks or to whatever drives the RPC handlers.
pub struct Node {
    pub persistence: PersistenceFacade,
    pub cache: Arc<BlockchainCache>,
    pub bus: Arc<InMemoryEventBus>,
    pub mempool: Arc<Mempool>,
    pub foundation: Arc<ChainFoundation>,
    pub scheduler: Arc<Scheduler>,
    pub indexer: Arc<hn_indexer::IndexingDispatcher>,
    pub membership_tree: Arc<MembershipTreeMaintainer>,

    pub blockchain_handler: BlockchainHandler,
    pub bank_handler: BankHandler,
    pub identity_handler: IdentityHandler,
    pub feeds_handler: FeedsHandler,
    pub reactions_handler: ReactionsHandler,
    pub membership_handler: MembershipHandler,
}

/// Build the registry: one [`RegistryEntry`] per [`PayloadKind`], the
/// nine non-reaction kinds sharing one [`StructuralSignatureValidator`]
/// and `NEW_REACTION` routed through [`ReactionValidator`].
fn build_registry(
    validator_keypair: Arc<Ed25519KeyPair>,
    persistence: PersistenceFacade,
    bus: Arc<InMemoryEventBus>,
) -> TransactionRegistry {
    let mut registry = TransactionRegistry::new();

    let structural: Arc<StructuralSignatureValidator> = Arc::new(StructuralSignatureValidator::new(
        StructuralSignatureValidator::all_non_reaction_kinds(),
        Arc::clone(&validator_keypair),
    ));

    let event_bus: Arc<dyn EventPublisher> = Arc::clone(&bus) as Arc<dyn EventPublisher>;

    registry.register(RegistryEntry::new(
        PayloadKind::REWARD,
        Arc::clone(&structural) as _,
        Arc::new(RewardStrategy::new(persistence.clone())),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::FULL_IDENTITY,
        Arc::clone(&structural) as _,
        Arc::new(FullIdentityStrategy::new(persistence.clone())),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::UPDATE_IDENTITY,
        Arc::clone(&structural) as _,
        Arc::new(UpdateIdentityStrategy::new(persistence.clone(), Arc::clone(&event_bus))),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::NEW_PERSONAL_FEED,
        Arc::clone(&structural) as _,
        Arc::new(NewPersonalFeedStrategy::new(persistence.clone())),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::NEW_CHAT_FEED,
        Arc::clone(&structural) as _,
        Arc::new(NewChatFeedStrategy::new(persistence.clone())),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::JOIN_GROUP_FEED,
        Arc::clone(&structural) as _,
        Arc::new(JoinGroupFeedStrategy::new(persistence.clone(), Arc::clone(&event_bus))),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::LEAVE_GROUP_FEED,
        Arc::clone(&structural) as _,
        Arc::new(LeaveGroupFeedStrategy::new(persistence.clone(), Arc::clone(&event_bus))),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::NEW_FEED_MESSAGE,
        Arc::clone(&structural) as _,
        Arc::new(NewFeedMessageStrategy::new(persistence.clone())),
    ));
    registry.register(RegistryEntry::new(
        PayloadKind::SEND_FUNDS,
        Arc::clone(&structural) as _,
        Arc::new(SendFundsStrategy::new(persistence.clone())),
    ));

    let zk_verifier: Arc<dyn hn_zk::ZkVerifier> = Arc::new(ToyCircuitVerifier::new());
    registry.register(RegistryEntry::new(
        PayloadKind::NEW_REACTION,
        Arc::new(ReactionValidator::new(validator_keypair, persistence.clone(), zk_verifier)),
        Arc::new(ReactionStrategy::new(persistence)),
    ));

    registry
}

impl Node {
    /// Construct every component. Nothing runs yet — call
    /// [`Node::run_background_tasks`] once `main` is ready to block.
    #[must_use]
    pub fn build(config: &NodeConfig, validator_keypair: Ed25519KeyPair) -> anyhow::Result<Self> {
        let validator_keypair = Arc::new(validator_keypair);
        let persistence = PersistenceFacade::new();
        let cache = Arc::new(BlockchainCache::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let event_bus: Arc<dyn EventPublisher> = Arc::clone(&bus) as Arc<dyn EventPublisher>;

        let idempotency = Arc::new(IdempotencyGate::new(persistence.clone()));
        let mempool = Arc::new(Mempool::new(idempotency.clone()));

        let registry = Arc::new(build_registry(
            Arc::clone(&validator_keypair),
            persistence.clone(),
            Arc::clone(&bus),
        ));

        let blockchain_state_id = BlockchainStateId::new();
        let assembler = Arc::new(hn_block_assembler::BlockAssembler::new(
            Arc::clone(&cache),
            persistence.clone(),
            Arc::clone(&event_bus),
            Arc::clone(&validator_keypair),
            blockchain_state_id,
        ));

        let foundation = Arc::new(ChainFoundation::new(
            persistence.clone(),
            Arc::clone(&assembler),
            Arc::clone(&event_bus),
            blockchain_state_id,
        ));

        let scheduler = Arc::new(
            Scheduler::new(Arc::clone(&mempool), Arc::clone(&assembler), Arc::clone(&bus))
                .with_tick_interval(std::time::Duration::from_millis(config.blockchain.block_interval_ms))
                .with_max_batch(config.mempool.max_drain_batch),
        );

        let indexer = Arc::new(hn_indexer::IndexingDispatcher::new(Arc::clone(&registry), Arc::clone(&bus)));

        let membership_tree = Arc::new(MembershipTreeMaintainer::new(
            persistence.clone(),
            Arc::clone(&cache),
            Arc::clone(&bus),
        ));

        let ingress = Arc::new(TransactionIngress::new(Arc::clone(&registry), Arc::clone(&idempotency), Arc::clone(&mempool)));

        Ok(Self {
            blockchain_handler: BlockchainHandler::new(Arc::clone(&cache), Arc::clone(&ingress)),
            bank_handler: BankHandler::new(persistence.clone()),
            identity_handler: IdentityHandler::new(persistence.clone()),
            feeds_handler: FeedsHandler::new(Arc::clone(&ingress), persistence.clone()),
            reactions_handler: ReactionsHandler::new(persistence.clone()),
            membership_handler: MembershipHandler::new(persistence.clone(), Arc::clone(&event_bus)),

            persistence,
            cache,
            bus,
            mempool,
            foundation,
            scheduler,
            indexer,
            membership_tree,
        })
    }

    /// Run genesis-or-resume, then spawn the scheduler, indexer, and
    /// membership-tree maintainer as background tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if chain-state lookup or genesis assembly fails.
    pub async fn start(&self) -> anyhow::Result<()> {
        self.foundation.initialize().await?;

        let scheduler = Arc::clone(&self.scheduler);
        tokio::spawn(async move { scheduler.run().await });

        let indexer = Arc::clone(&self.indexer);
        tokio::spawn(async move { indexer.run().await });

        let membership_tree = Arc::clone(&self.membership_tree);
        tokio::spawn(async move { membership_tree.run().await });

        Ok(())
    }
}
