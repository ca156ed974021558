//! The indexing dispatcher itself (§4.11): fans committed transactions
//! out to their index strategies and announces completion.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};

use hn_bus::{EventFilter, EventTopic, InMemoryEventBus, NodeEvent};
use hn_registry::TransactionRegistry;
use hn_types::{BlockIndex, FinalizedBlock, ValidatedTransaction};

/// Drives strategy dispatch for every block the chain commits.
///
/// Holds the concrete [`InMemoryEventBus`] rather than the
/// `EventPublisher` trait object because it both subscribes to
/// `BlockCreated` and publishes `BlockIndexCompleted` on the same bus.
pub struct IndexingDispatcher {
    registry: Arc<TransactionRegistry>,
    bus: Arc<InMemoryEventBus>,
}

impl IndexingDispatcher {
    #[must_use]
    pub fn new(registry: Arc<TransactionRegistry>, bus: Arc<InMemoryEventBus>) -> Self {
        Self { registry, bus }
    }

    /// Subscribe to `BlockCreated` and index every block forever.
    ///
    /// Runs until the event bus itself is dropped.
    pub async fn run(&self) {
        let mut sub = self
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::BlockProduction]));
        while let Some(event) = sub.recv().await {
            if let NodeEvent::BlockCreated(block) = event {
                self.index_block(&block).await;
            }
        }
    }

    /// Dispatch every transaction in `block` to its matching strategy,
    /// running all transactions concurrently, then publish
    /// `BlockIndexCompleted` once every invocation has returned.
    ///
    /// A transaction with no registered strategy, or a strategy call
    /// that errors, is logged and does not block the rest of the
    /// block — partial success is the documented contract.
    pub async fn index_block(&self, block: &FinalizedBlock) {
        let block_index = block.block_index();
        let transactions = block.signed.unsigned.transactions.clone();
        let transaction_count = transactions.len();

        let mut tasks = JoinSet::new();
        for tx in transactions {
            let registry = Arc::clone(&self.registry);
            tasks.spawn(async move {
                Self::dispatch_transaction(&registry, &tx, block_index).await;
            });
        }
        while let Some(result) = tasks.join_next().await {
            if let Err(join_err) = result {
                error!(%join_err, %block_index, "index strategy task panicked");
            }
        }

        self.bus
            .publish(NodeEvent::BlockIndexCompleted(block_index))
            .await;
        info!(%block_index, transaction_count, "block indexing completed");
    }

    /// Look up and run the single strategy registered for this
    /// transaction's payload kind.
    ///
    /// Each payload kind maps to exactly one registered strategy (see
    /// `hn-registry`), so the "set of strategies that `CanHandle` this
    /// transaction" is always zero or one member here; running several
    /// strategies concurrently against one transaction has no
    /// observable case to exercise under this registry shape. The
    /// dispatcher still runs every transaction in the block
    /// concurrently, which is where this model's real parallelism is.
    async fn dispatch_transaction(
        registry: &TransactionRegistry,
        tx: &ValidatedTransaction,
        block_index: BlockIndex,
    ) {
        let kind = tx.payload_kind();
        match registry.lookup(kind) {
            Ok(entry) => {
                if let Err(err) = entry.strategy.handle(tx, block_index).await {
                    error!(
                        %err,
                        transaction_id = %tx.transaction_id(),
                        %block_index,
                        "index strategy failed"
                    );
                }
            }
            Err(err) => {
                error!(
                    %err,
                    transaction_id = %tx.transaction_id(),
                    %block_index,
                    "no index strategy registered for payload kind"
                );
            }
        }
    }
}
