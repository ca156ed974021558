//! Opaque typed identifiers.
//!
//! Every entity identifier in the system wraps a fixed-width primitive
//! instead of a bare `Uuid`/`i64`, so a `FeedId` and a `ReactionId` can
//! never be accidentally swapped at a call site. Each type's `Display`
//! is its canonical JSON string form.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// The well-known empty/absent value.
            pub const EMPTY: $name = $name(Uuid::nil());

            /// Mint a fresh, random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns true if this is the empty sentinel.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                *self == Self::EMPTY
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::EMPTY
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }
    };
}

uuid_id!(BlockId, "Identifies a block.");
uuid_id!(BlockchainStateId, "Identifies a chain-state row (there is ever only one live).");
uuid_id!(TransactionId, "Identifies a transaction.");
uuid_id!(FeedId, "Identifies a feed (personal, chat, or group).");
uuid_id!(FeedMessageId, "Identifies a message within a feed.");
uuid_id!(ReactionId, "Identifies a single reaction submission.");

impl BlockId {
    /// The block id used for the genesis block's synthetic parent.
    ///
    /// Distinct from [`BlockId::EMPTY`] only in intent: `Empty` marks
    /// "no block", `Genesis` marks "the well-known first block's own id"
    /// when referenced before it has been minted.
    pub const GENESIS: BlockId = BlockId(Uuid::from_u128(0x6845_6e45_7447_656e_6573_6973_0000_0001));
}

/// A block's position in the chain.
///
/// Signed so that `EMPTY` can be represented without a sentinel collision
/// with a real genesis index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockIndex(pub i64);

impl BlockIndex {
    /// No block has been produced yet.
    pub const EMPTY: BlockIndex = BlockIndex(-1);

    /// The index of the genesis block.
    pub const GENESIS: BlockIndex = BlockIndex(1);

    /// The index immediately following this one.
    #[must_use]
    pub fn next(self) -> Self {
        BlockIndex(self.0 + 1)
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
