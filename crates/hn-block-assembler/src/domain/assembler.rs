//! The block assembler itself (§4.8): unsigned → signed → finalized,
//! committed to the blockchain context in a single transaction.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use hn_bus::{EventPublisher, NodeEvent};
use hn_cache::{BlockchainCache, ChainTip};
use hn_crypto::{blake3_hash, Ed25519KeyPair};
use hn_persistence::PersistenceFacade;
use hn_types::{
    BlockId, BlockIndex, BlockchainBlock, BlockchainState, BlockchainStateId, CoreError,
    FinalizedBlock, PublicAddress, SignatureInfo, SignedBlock, Timestamp, TransactionPayload,
    UnsignedBlock, UnsignedTransaction, ValidatedTransaction,
};
use hn_types::payload::RewardPayload;

/// Reward amount minted into the producer's own address each block.
/// Spec leaves the reward schedule unspecified; a fixed constant is the
/// simplest reading that keeps the chain of custody (issuer signs and
/// countersigns its own mint) exercised every block.
const BLOCK_REWARD_AMOUNT: &str = "1";
const BLOCK_REWARD_TOKEN: &str = "HUSH";

/// Produces blocks and commits them, one at a time, under a single
/// commit lock held across the whole 1–5 sequence in §4.8.
pub struct BlockAssembler {
    cache: Arc<BlockchainCache>,
    persistence: PersistenceFacade,
    bus: Arc<dyn EventPublisher>,
    producer_keypair: Arc<Ed25519KeyPair>,
    blockchain_state_id: BlockchainStateId,
    commit_lock: Mutex<()>,
}

impl BlockAssembler {
    #[must_use]
    pub fn new(
        cache: Arc<BlockchainCache>,
        persistence: PersistenceFacade,
        bus: Arc<dyn EventPublisher>,
        producer_keypair: Arc<Ed25519KeyPair>,
        blockchain_state_id: BlockchainStateId,
    ) -> Self {
        Self {
            cache,
            persistence,
            bus,
            producer_keypair,
            blockchain_state_id,
            commit_lock: Mutex::new(()),
        }
    }

    fn producer_address(&self) -> PublicAddress {
        PublicAddress(hex::encode(self.producer_keypair.public_key().as_bytes()))
    }

    /// Build, sign, and countersign the reward transaction prepended to
    /// every assembled block. Both signatures come from this node's own
    /// keypair: the producer both issues and countersigns its own mint.
    fn reward_transaction(&self) -> Result<ValidatedTransaction, CoreError> {
        let payload = TransactionPayload::Reward(RewardPayload {
            issuer: self.producer_address(),
            token: BLOCK_REWARD_TOKEN.into(),
            amount: BLOCK_REWARD_AMOUNT.to_string(),
        });
        let unsigned = UnsignedTransaction::new(payload)
            .map_err(|e| CoreError::AssemblyConflict(format!("reward payload not serializable: {e}")))?;
        let unsigned_json = unsigned
            .canonical_json()
            .map_err(|e| CoreError::AssemblyConflict(format!("unsigned reward not serializable: {e}")))?;
        let user_signature = self.producer_keypair.sign(unsigned_json.as_bytes());
        let signed = hn_types::SignedTransaction {
            unsigned,
            user_signature: SignatureInfo {
                signatory_public_address: self.producer_address(),
                signature: user_signature.as_bytes().to_vec(),
            },
        };
        let signed_json = signed
            .canonical_json()
            .map_err(|e| CoreError::AssemblyConflict(format!("signed reward not serializable: {e}")))?;
        let validator_signature = self.producer_keypair.sign(signed_json.as_bytes());
        Ok(ValidatedTransaction {
            signed,
            validator_signature: SignatureInfo {
                signatory_public_address: self.producer_address(),
                signature: validator_signature.as_bytes().to_vec(),
            },
        })
    }

    fn sign_and_finalize(&self, unsigned: UnsignedBlock) -> Result<FinalizedBlock, CoreError> {
        let unsigned_json = unsigned
            .canonical_json()
            .map_err(|e| CoreError::AssemblyConflict(format!("unsigned block not serializable: {e}")))?;
        let signature = self.producer_keypair.sign(unsigned_json.as_bytes());
        let signed = SignedBlock {
            unsigned,
            block_producer_signature: SignatureInfo {
                signatory_public_address: self.producer_address(),
                signature: signature.as_bytes().to_vec(),
            },
        };
        let signed_json = signed
            .canonical_json()
            .map_err(|e| CoreError::AssemblyConflict(format!("signed block not serializable: {e}")))?;
        let hash = blake3_hash(signed_json.as_bytes());
        Ok(FinalizedBlock { signed, hash })
    }

    /// Steps 2–4 of §4.8: build the block over the given tip fields,
    /// sign, finalize, and commit it in one writable unit of work.
    async fn build_and_commit(
        &self,
        block_index: BlockIndex,
        previous_block_id: BlockId,
        current_block_id: BlockId,
        next_block_id: BlockId,
        mut transactions: Vec<ValidatedTransaction>,
    ) -> Result<FinalizedBlock, CoreError> {
        let reward = self.reward_transaction()?;
        let mut ordered = Vec::with_capacity(transactions.len() + 1);
        ordered.push(reward);
        ordered.append(&mut transactions);

        let unsigned = UnsignedBlock {
            block_id: current_block_id,
            timestamp: Timestamp::now(),
            block_index,
            previous_block_id,
            next_block_id,
            transactions: ordered,
        };
        let finalized = self.sign_and_finalize(unsigned)?;

        let uow = self.persistence.create_writable();
        let block_row = BlockchainBlock::from_finalized(&finalized)
            .map_err(|e| CoreError::AssemblyConflict(format!("block row not serializable: {e}")))?;
        uow.blockchain()
            .insert_block(&block_row)
            .map_err(|e| CoreError::AssemblyConflict(format!("block insert failed: {e}")))?;
        uow.blockchain()
            .upsert_blockchain_state(&BlockchainState {
                blockchain_state_id: self.blockchain_state_id,
                block_index,
                current_block_id,
                previous_block_id,
                next_block_id,
            })
            .map_err(|e| CoreError::AssemblyConflict(format!("state upsert failed: {e}")))?;
        uow.commit()
            .await
            .map_err(|e| CoreError::AssemblyConflict(format!("commit failed: {e}")))?;

        Ok(finalized)
    }

    /// Assemble, sign, and commit a block over the given drained batch.
    ///
    /// Advances the cache under the commit lock before building the
    /// block; rolls the advance back if the commit fails, and never
    /// publishes on failure.
    pub async fn assemble(&self, transactions: Vec<ValidatedTransaction>) -> Result<FinalizedBlock, CoreError> {
        let _guard = self.commit_lock.lock().await;

        let previous_tip = self.cache.snapshot();
        let advanced = previous_tip.advance(BlockId::new());
        self.cache.set(advanced);

        let _timer = hn_telemetry::time_histogram!(hn_telemetry::BLOCK_PRODUCTION_DURATION);
        let result = self
            .build_and_commit(
                advanced.last_block_index(),
                advanced.previous_block_id(),
                advanced.current_block_id(),
                advanced.next_block_id(),
                transactions,
            )
            .await;

        match result {
            Ok(finalized) => {
                hn_telemetry::BLOCKS_PRODUCED.inc();
                self.bus.publish(NodeEvent::BlockCreated(Box::new(finalized.clone()))).await;
                info!(block_index = %finalized.block_index(), "block assembled and committed");
                Ok(finalized)
            }
            Err(err) => {
                self.cache.set(previous_tip);
                error!(%err, "block assembly failed, cache advance rolled back");
                Err(err)
            }
        }
    }

    /// Assemble and commit the genesis block directly from the
    /// genesis `BlockchainState` chain foundation built — no cache
    /// advance, since the cache starts out absent.
    pub async fn assemble_genesis(&self, genesis_state: BlockchainState) -> Result<FinalizedBlock, CoreError> {
        let _guard = self.commit_lock.lock().await;

        let _timer = hn_telemetry::time_histogram!(hn_telemetry::BLOCK_PRODUCTION_DURATION);
        let result = self
            .build_and_commit(
                genesis_state.block_index,
                genesis_state.previous_block_id,
                genesis_state.current_block_id,
                genesis_state.next_block_id,
                Vec::new(),
            )
            .await;

        match result {
            Ok(finalized) => {
                hn_telemetry::BLOCKS_PRODUCED.inc();
                let tip = ChainTip::absent()
                    .with_last_block_index(genesis_state.block_index)
                    .with_previous_block_id(genesis_state.previous_block_id)
                    .with_current_block_id(genesis_state.current_block_id)
                    .with_next_block_id(genesis_state.next_block_id)
                    .with_blockchain_state_present(true);
                self.cache.set(tip);
                self.bus.publish(NodeEvent::BlockCreated(Box::new(finalized.clone()))).await;
                info!("genesis block assembled and committed");
                Ok(finalized)
            }
            Err(err) => {
                error!(%err, "genesis assembly failed");
                Err(err)
            }
        }
    }
}
