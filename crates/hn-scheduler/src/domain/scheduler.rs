//! The block-production scheduler (§4.10): a single-threaded cooperative
//! tick loop, paused until genesis, woken early by incoming
//! transactions and otherwise driven by a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, error};

use hn_block_assembler::BlockAssembler;
use hn_bus::{EventFilter, EventTopic, InMemoryEventBus, NodeEvent};
use hn_mempool::Mempool;
use hn_types::FinalizedBlock;

/// Default interval between ticks when no transaction wakes the loop early.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Drives `Mempool::drain` + `BlockAssembler::assemble` on a loop.
///
/// Runs as a single sequential `async` task: `run` never spawns a
/// concurrent tick, so "must not run two assemblies concurrently" holds
/// by construction, on top of the assembler's own commit lock.
pub struct Scheduler {
    mempool: Arc<Mempool>,
    assembler: Arc<BlockAssembler>,
    bus: Arc<InMemoryEventBus>,
    tick_interval: Duration,
    max_batch: Option<usize>,
}

impl Scheduler {
    #[must_use]
    pub fn new(mempool: Arc<Mempool>, assembler: Arc<BlockAssembler>, bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            mempool,
            assembler,
            bus,
            tick_interval: DEFAULT_TICK_INTERVAL,
            max_batch: None,
        }
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = Some(max_batch);
        self
    }

    /// Block until `BlockchainInitialized` is published, then loop
    /// forever: sleep for the tick interval, or wake early on a
    /// `TransactionReceived`, then drain and (maybe) assemble.
    ///
    /// Runs until the event bus itself is dropped.
    pub async fn run(&self) {
        self.wait_for_initialization().await;

        let notify = Arc::new(Notify::new());
        self.spawn_wake_loop(Arc::clone(&notify));

        loop {
            tokio::select! {
                () = tokio::time::sleep(self.tick_interval) => {}
                () = notify.notified() => {}
            }
            self.tick().await;
        }
    }

    async fn wait_for_initialization(&self) {
        let mut sub = self.bus.subscribe(EventFilter::topics(vec![EventTopic::ChainFoundation]));
        sub.recv().await;
    }

    /// Subscribes to `TransactionReceived` (wakes the loop early,
    /// coalescing naturally since `Notify::notify_one` collapses
    /// repeated notifications into a single pending permit) and
    /// `BlockCreated` (observability only).
    fn spawn_wake_loop(&self, notify: Arc<Notify>) {
        let mut sub = self
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Mempool, EventTopic::BlockProduction]));
        tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                match event {
                    NodeEvent::TransactionReceived { .. } => notify.notify_one(),
                    NodeEvent::BlockCreated(block) => {
                        debug!(block_index = %block.block_index(), "scheduler observed a committed block");
                    }
                    _ => {}
                }
            }
        });
    }

    /// Drain the mempool and assemble a block if the batch is non-empty.
    /// Exposed directly so tests can drive ticks without a timer.
    pub async fn tick(&self) -> Option<FinalizedBlock> {
        let batch = self.mempool.drain(self.max_batch).await;
        if batch.is_empty() {
            return None;
        }
        match self.assembler.assemble(batch).await {
            Ok(block) => Some(block),
            Err(err) => {
                error!(%err, "block assembly failed, scheduler continues on next tick");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_bus::EventPublisher;
    use hn_cache::BlockchainCache;
    use hn_crypto::Ed25519KeyPair;
    use hn_idempotency::IdempotencyGate;
    use hn_persistence::PersistenceFacade;
    use hn_types::{BlockchainStateId, PayloadKind, SignatureInfo, SignedTransaction, TransactionPayload, UnsignedTransaction, ValidatedTransaction};

    fn validated_reward() -> ValidatedTransaction {
        let payload = TransactionPayload::Reward(hn_types::payload::RewardPayload {
            issuer: "alice".into(),
            token: "HUSH".into(),
            amount: "1".to_string(),
        });
        let unsigned = UnsignedTransaction::new(payload).unwrap();
        let signed = SignedTransaction {
            unsigned,
            user_signature: SignatureInfo {
                signatory_public_address: "alice".into(),
                signature: vec![],
            },
        };
        ValidatedTransaction {
            signed,
            validator_signature: SignatureInfo {
                signatory_public_address: "validator".into(),
                signature: vec![],
            },
        }
    }

    fn scheduler() -> (Scheduler, Arc<Mempool>, Arc<InMemoryEventBus>) {
        let persistence = PersistenceFacade::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let idempotency = Arc::new(IdempotencyGate::new(persistence.clone()));
        let mempool = Arc::new(Mempool::new(idempotency));
        let assembler = Arc::new(BlockAssembler::new(
            Arc::new(BlockchainCache::new()),
            persistence,
            Arc::clone(&bus) as Arc<dyn EventPublisher>,
            Arc::new(Ed25519KeyPair::generate()),
            BlockchainStateId::new(),
        ));
        let scheduler = Scheduler::new(Arc::clone(&mempool), assembler, Arc::clone(&bus));
        (scheduler, mempool, bus)
    }

    #[tokio::test]
    async fn tick_with_empty_mempool_assembles_nothing() {
        let (scheduler, _mempool, _bus) = scheduler();
        assert!(scheduler.tick().await.is_none());
    }

    #[tokio::test]
    async fn tick_with_pending_transactions_assembles_a_block() {
        let (scheduler, mempool, _bus) = scheduler();
        mempool.add(validated_reward());

        let block = scheduler.tick().await.unwrap();

        // Reward prepended by the assembler, plus the one drained transaction.
        assert_eq!(block.signed.unsigned.transactions.len(), 2);
    }

    #[tokio::test]
    async fn with_max_batch_caps_transactions_per_tick() {
        let (scheduler, mempool, _bus) = scheduler();
        let scheduler = scheduler.with_max_batch(1);
        mempool.add(validated_reward());
        mempool.add(validated_reward());

        scheduler.tick().await.unwrap();

        assert_eq!(mempool.len(), 1);
    }

    #[test]
    fn payload_kind_is_reward() {
        assert_eq!(validated_reward().payload_kind(), PayloadKind::REWARD);
    }

    #[test]
    fn default_tick_interval_is_half_a_second() {
        assert_eq!(DEFAULT_TICK_INTERVAL, Duration::from_millis(500));
    }
}
