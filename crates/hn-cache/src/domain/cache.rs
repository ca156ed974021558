//! The process-wide singleton itself.

use parking_lot::RwLock;

use super::entities::ChainTip;

/// Process-wide holder of the current [`ChainTip`].
///
/// Written only by the block assembler, under its commit lock — this
/// type contributes the memory safety (so concurrent readers never see
/// a torn snapshot), not the commit-lock discipline itself, which lives
/// in `hn-block-assembler`. Readers (validators, RPC handlers) only ever
/// see a fully-formed tip, never a partially-advanced one, because
/// `set` replaces the whole snapshot in one lock acquisition.
pub struct BlockchainCache {
    tip: RwLock<ChainTip>,
}

impl BlockchainCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tip: RwLock::new(ChainTip::absent()),
        }
    }

    /// Read the whole tip at once.
    #[must_use]
    pub fn snapshot(&self) -> ChainTip {
        *self.tip.read()
    }

    #[must_use]
    pub fn last_block_index(&self) -> hn_types::BlockIndex {
        self.tip.read().last_block_index()
    }

    #[must_use]
    pub fn previous_block_id(&self) -> hn_types::BlockId {
        self.tip.read().previous_block_id()
    }

    #[must_use]
    pub fn current_block_id(&self) -> hn_types::BlockId {
        self.tip.read().current_block_id()
    }

    #[must_use]
    pub fn next_block_id(&self) -> hn_types::BlockId {
        self.tip.read().next_block_id()
    }

    #[must_use]
    pub fn blockchain_state_present(&self) -> bool {
        self.tip.read().blockchain_state_present()
    }

    /// Replace the tip wholesale. Only the block assembler, under its
    /// commit lock, should ever call this.
    pub fn set(&self, tip: ChainTip) {
        *self.tip.write() = tip;
    }
}

impl Default for BlockchainCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_types::{BlockId, BlockIndex};

    #[test]
    fn new_cache_is_absent() {
        let cache = BlockchainCache::new();
        assert!(!cache.blockchain_state_present());
        assert_eq!(cache.last_block_index(), BlockIndex::EMPTY);
    }

    #[test]
    fn set_replaces_whole_snapshot() {
        let cache = BlockchainCache::new();
        let tip = ChainTip::absent()
            .with_last_block_index(BlockIndex::GENESIS)
            .with_current_block_id(BlockId::GENESIS)
            .with_blockchain_state_present(true);

        cache.set(tip);

        assert_eq!(cache.last_block_index(), BlockIndex::GENESIS);
        assert_eq!(cache.current_block_id(), BlockId::GENESIS);
        assert!(cache.blockchain_state_present());
    }

    #[test]
    fn snapshot_matches_individual_getters() {
        let cache = BlockchainCache::new();
        cache.set(ChainTip::absent().with_blockchain_state_present(true));
        let snap = cache.snapshot();
        assert_eq!(snap.blockchain_state_present(), cache.blockchain_state_present());
    }
}
