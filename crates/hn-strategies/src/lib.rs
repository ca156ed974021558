//! Index strategies: one per registered [`hn_types::PayloadKind`],
//! projecting a validated, committed transaction onto the store's
//! derived state (balances, profiles, feeds, reaction tallies).
//!
//! Every strategy implements [`hn_registry::IndexStrategy`] and is
//! idempotent on replay — `hn-indexer` dispatches the same committed
//! transaction at most once in ordinary operation, but a strategy
//! never assumes that.

pub mod domain;

pub use domain::{
    FullIdentityStrategy, JoinGroupFeedStrategy, LeaveGroupFeedStrategy, MembershipTreeMaintainer,
    NewChatFeedStrategy, NewFeedMessageStrategy, NewPersonalFeedStrategy, ReactionStrategy,
    RewardStrategy, SendFundsStrategy, UpdateIdentityStrategy,
};
