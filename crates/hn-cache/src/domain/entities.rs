//! The chain-tip snapshot itself.

use hn_types::{BlockId, BlockIndex};

/// Everything the cache knows about the current head of the chain.
///
/// Before genesis is assembled, this is the all-empty/absent value.
/// Setters are fluent (consume and return `Self`) so the block assembler
/// can build the next snapshot in one expression under the commit lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTip {
    last_block_index: BlockIndex,
    previous_block_id: BlockId,
    current_block_id: BlockId,
    next_block_id: BlockId,
    blockchain_state_present: bool,
}

impl ChainTip {
    /// The tip before any block has ever been produced.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            last_block_index: BlockIndex::EMPTY,
            previous_block_id: BlockId::EMPTY,
            current_block_id: BlockId::EMPTY,
            next_block_id: BlockId::EMPTY,
            blockchain_state_present: false,
        }
    }

    #[must_use]
    pub fn with_last_block_index(mut self, value: BlockIndex) -> Self {
        self.last_block_index = value;
        self
    }

    #[must_use]
    pub fn with_previous_block_id(mut self, value: BlockId) -> Self {
        self.previous_block_id = value;
        self
    }

    #[must_use]
    pub fn with_current_block_id(mut self, value: BlockId) -> Self {
        self.current_block_id = value;
        self
    }

    #[must_use]
    pub fn with_next_block_id(mut self, value: BlockId) -> Self {
        self.next_block_id = value;
        self
    }

    #[must_use]
    pub fn with_blockchain_state_present(mut self, value: bool) -> Self {
        self.blockchain_state_present = value;
        self
    }

    #[must_use]
    pub fn last_block_index(&self) -> BlockIndex {
        self.last_block_index
    }

    #[must_use]
    pub fn previous_block_id(&self) -> BlockId {
        self.previous_block_id
    }

    #[must_use]
    pub fn current_block_id(&self) -> BlockId {
        self.current_block_id
    }

    #[must_use]
    pub fn next_block_id(&self) -> BlockId {
        self.next_block_id
    }

    #[must_use]
    pub fn blockchain_state_present(&self) -> bool {
        self.blockchain_state_present
    }

    /// The next tip an assembled block advances to: `bi' = bi+1`,
    /// `prev' = current`, `current' = next`, `next' = fresh_next_id`.
    ///
    /// The caller supplies `fresh_next_id` (minted outside this crate,
    /// which has no randomness source of its own).
    #[must_use]
    pub fn advance(&self, fresh_next_id: BlockId) -> Self {
        Self {
            last_block_index: self.last_block_index.next(),
            previous_block_id: self.current_block_id,
            current_block_id: self.next_block_id,
            next_block_id: fresh_next_id,
            blockchain_state_present: true,
        }
    }
}

impl Default for ChainTip {
    fn default() -> Self {
        Self::absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_tip_has_no_state() {
        let tip = ChainTip::absent();
        assert!(!tip.blockchain_state_present());
        assert_eq!(tip.last_block_index(), BlockIndex::EMPTY);
        assert_eq!(tip.previous_block_id(), BlockId::EMPTY);
    }

    #[test]
    fn advance_shifts_current_into_previous() {
        let genesis_current = BlockId::GENESIS;
        let tip = ChainTip::absent()
            .with_last_block_index(BlockIndex::GENESIS)
            .with_current_block_id(genesis_current)
            .with_next_block_id(BlockId::new())
            .with_blockchain_state_present(true);

        let next_next = BlockId::new();
        let advanced = tip.advance(next_next);

        assert_eq!(advanced.last_block_index(), BlockIndex::GENESIS.next());
        assert_eq!(advanced.previous_block_id(), genesis_current);
        assert_eq!(advanced.current_block_id(), tip.next_block_id());
        assert_eq!(advanced.next_block_id(), next_next);
        assert!(advanced.blockchain_state_present());
    }

    #[test]
    fn fluent_setters_chain() {
        let tip = ChainTip::absent()
            .with_last_block_index(BlockIndex::GENESIS)
            .with_blockchain_state_present(true);
        assert_eq!(tip.last_block_index(), BlockIndex::GENESIS);
        assert!(tip.blockchain_state_present());
    }
}
