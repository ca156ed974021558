//! # RPC Surface
//!
//! The handler types behind every external interface in spec §6:
//! `HushBlockchain`, `HushBank`, `HushIdentity`, `HushFeeds`,
//! `HushReactions`, `HushMembership`. Every write path —
//! `HushBlockchain.SubmitSignedTransaction` and every `HushFeeds.*`
//! mutation — funnels through one shared [`TransactionIngress`]; every
//! read path wraps `hn-persistence`/`hn-cache` directly, since both are
//! built to be read freely outside their owning components.
//!
//! `node-runtime` is the transport: it decodes whatever wire framing it
//! chooses (HTTP, a queue, a test harness) into the byte slices and
//! typed arguments these handlers expect, and re-encodes their results.
//! Nothing in this crate binds to a transport.

pub mod domain;

pub use domain::{
    BankHandler, BlockchainHandler, FeedsHandler, IdentityHandler, MembershipHandler,
    MembershipProof, ReactionsHandler, SubmitTransactionResponse, TransactionIngress,
};
