//! Block envelope and the persisted chain-tip row.

use crate::ids::{BlockId, BlockIndex, BlockchainStateId};
use crate::timestamp::Timestamp;
use crate::transaction::{SignatureInfo, ValidatedTransaction};
use serde::{Deserialize, Serialize};

/// A block before it has been signed by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedBlock {
    pub block_id: BlockId,
    pub timestamp: Timestamp,
    pub block_index: BlockIndex,
    pub previous_block_id: BlockId,
    pub next_block_id: BlockId,
    pub transactions: Vec<ValidatedTransaction>,
}

impl UnsignedBlock {
    /// Canonical JSON of this state — the bytes the producer signature covers.
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// An unsigned block plus the block producer's signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedBlock {
    #[serde(flatten)]
    pub unsigned: UnsignedBlock,
    pub block_producer_signature: SignatureInfo,
}

impl SignedBlock {
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn extract_unsigned(&self) -> &UnsignedBlock {
        &self.unsigned
    }
}

/// A signed block plus the content hash of its own JSON — the persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedBlock {
    #[serde(flatten)]
    pub signed: SignedBlock,
    pub hash: [u8; 32],
}

impl FinalizedBlock {
    #[must_use]
    pub fn block_id(&self) -> BlockId {
        self.signed.unsigned.block_id
    }

    #[must_use]
    pub fn block_index(&self) -> BlockIndex {
        self.signed.unsigned.block_index
    }

    #[must_use]
    pub fn previous_block_id(&self) -> BlockId {
        self.signed.unsigned.previous_block_id
    }

    #[must_use]
    pub fn next_block_id(&self) -> BlockId {
        self.signed.unsigned.next_block_id
    }
}

/// The row persisted for a finalized block.
///
/// `block_json` stores the [`FinalizedBlock`]'s canonical JSON verbatim,
/// so a full replay from genesis is always possible without a separate
/// encoding scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockchainBlock {
    pub block_id: BlockId,
    pub block_index: BlockIndex,
    pub previous_block_id: BlockId,
    pub next_block_id: BlockId,
    pub hash: [u8; 32],
    pub block_json: String,
}

impl BlockchainBlock {
    /// Build the persisted row from a finalized block.
    pub fn from_finalized(block: &FinalizedBlock) -> serde_json::Result<Self> {
        Ok(Self {
            block_id: block.block_id(),
            block_index: block.block_index(),
            previous_block_id: block.previous_block_id(),
            next_block_id: block.next_block_id(),
            hash: block.hash,
            block_json: serde_json::to_string(block)?,
        })
    }
}

/// The single-row chain tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainState {
    pub blockchain_state_id: BlockchainStateId,
    pub block_index: BlockIndex,
    pub current_block_id: BlockId,
    pub previous_block_id: BlockId,
    pub next_block_id: BlockId,
}

impl BlockchainState {
    /// The well-known initial value used before any block has been committed.
    #[must_use]
    pub fn genesis(blockchain_state_id: BlockchainStateId, current_block_id: BlockId, next_block_id: BlockId) -> Self {
        Self {
            blockchain_state_id,
            block_index: BlockIndex::GENESIS,
            current_block_id,
            previous_block_id: BlockId::EMPTY,
            next_block_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_row_carries_verbatim_json() {
        let unsigned = UnsignedBlock {
            block_id: BlockId::new(),
            timestamp: Timestamp::now(),
            block_index: BlockIndex::GENESIS,
            previous_block_id: BlockId::EMPTY,
            next_block_id: BlockId::new(),
            transactions: vec![],
        };
        let signed = SignedBlock {
            unsigned,
            block_producer_signature: SignatureInfo {
                signatory_public_address: "producer".into(),
                signature: vec![9, 9, 9],
            },
        };
        let finalized = FinalizedBlock {
            signed,
            hash: [7u8; 32],
        };
        let row = BlockchainBlock::from_finalized(&finalized).unwrap();
        let decoded: FinalizedBlock = serde_json::from_str(&row.block_json).unwrap();
        assert_eq!(decoded, finalized);
    }
}
