//! `HushBlockchain` (spec §6): chain height and transaction submission.

use std::sync::Arc;

use hn_cache::BlockchainCache;

use super::ingress::{SubmitTransactionResponse, TransactionIngress};

pub struct BlockchainHandler {
    cache: Arc<BlockchainCache>,
    ingress: Arc<TransactionIngress>,
}

impl BlockchainHandler {
    #[must_use]
    pub fn new(cache: Arc<BlockchainCache>, ingress: Arc<TransactionIngress>) -> Self {
        Self { cache, ingress }
    }

    /// `GetBlockchainHeight() → {index: int64}`.
    #[must_use]
    pub fn get_blockchain_height(&self) -> i64 {
        self.cache.last_block_index().0
    }

    /// `SubmitSignedTransaction(bytes) → {status, message}`.
    pub async fn submit_signed_transaction(&self, bytes: &[u8]) -> SubmitTransactionResponse {
        self.ingress.submit(bytes).await
    }
}
