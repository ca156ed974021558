//! # Hush Network Shared Types
//!
//! Every domain entity, identifier, and wire envelope shared across the
//! node's crates lives here so no two crates invent their own copy of
//! the same row shape.

pub mod address;
pub mod bank;
pub mod block;
pub mod errors;
pub mod feeds;
pub mod identity;
pub mod ids;
pub mod payload;
pub mod reactions;
pub mod timestamp;
pub mod transaction;

pub use address::{PublicAddress, Token};
pub use bank::AddressBalance;
pub use block::{BlockchainBlock, BlockchainState, FinalizedBlock, SignedBlock, UnsignedBlock};
pub use errors::{CoreError, RpcStatus};
pub use feeds::{Feed, FeedMessage, FeedParticipant, FeedType, ParticipantType};
pub use identity::IdentityProfile;
pub use ids::{
    BlockId, BlockIndex, BlockchainStateId, FeedId, FeedMessageId, ReactionId, TransactionId,
};
pub use payload::{PayloadKind, TransactionPayload, CurveCoordinate, REACTION_SLOT_COUNT};
pub use reactions::{
    FeedMemberCommitment, MerkleRootHistory, MessageReactionTally, ReactionNullifier,
};
pub use timestamp::Timestamp;
pub use transaction::{SignatureInfo, SignedTransaction, UnsignedTransaction, ValidatedTransaction};
