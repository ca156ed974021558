//! # Node Events
//!
//! Everything published to the event bus: the choreography that links
//! chain foundation, the scheduler, the block assembler, and the
//! indexing dispatcher together without any of them calling one another
//! directly.

use hn_types::{BlockIndex, FeedId, FinalizedBlock, PublicAddress, TransactionId};
use serde::{Deserialize, Serialize};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeEvent {
    /// Chain foundation found (or built) the genesis state and the node
    /// is ready to start producing blocks. Unblocks the scheduler.
    BlockchainInitialized,

    /// A transaction was accepted into the mempool.
    TransactionReceived {
        /// The accepted transaction's id.
        transaction_id: TransactionId,
    },

    /// A block was signed, finalized, and committed.
    BlockCreated(Box<FinalizedBlock>),

    /// Every index strategy invocation triggered by this block's
    /// `BlockCreated` has returned.
    BlockIndexCompleted(BlockIndex),

    /// An identity's alias was updated by `UpdateIdentityStrategy`.
    IdentityUpdated {
        /// The identity whose profile changed.
        public_signing_address: PublicAddress,
    },

    /// A feed's membership changed (join/leave/ban/unban), for the
    /// Merkle tree maintainer to recompute and append a new root.
    FeedMembershipChanged {
        /// The feed whose membership set changed.
        feed_id: FeedId,
    },

    /// Critical error requiring operator attention, routed to the
    /// dead-letter topic rather than a normal subscriber.
    CriticalError {
        /// The component that raised the error.
        component: String,
        /// Error description.
        message: String,
    },
}

impl NodeEvent {
    /// The topic for this event (for subscription filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockchainInitialized => EventTopic::ChainFoundation,
            Self::TransactionReceived { .. } => EventTopic::Mempool,
            Self::BlockCreated(_) => EventTopic::BlockProduction,
            Self::BlockIndexCompleted(_) => EventTopic::Indexing,
            Self::IdentityUpdated { .. } => EventTopic::Identity,
            Self::FeedMembershipChanged { .. } => EventTopic::Membership,
            Self::CriticalError { .. } => EventTopic::DeadLetterQueue,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// `BlockchainInitialized`.
    ChainFoundation,
    /// `TransactionReceived`.
    Mempool,
    /// `BlockCreated`.
    BlockProduction,
    /// `BlockIndexCompleted`.
    Indexing,
    /// `IdentityUpdated`.
    Identity,
    /// `FeedMembershipChanged`.
    Membership,
    /// Dead Letter Queue for critical errors.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &NodeEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
