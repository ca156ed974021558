//! # Content Validators
//!
//! [`StructuralSignatureValidator`] covers every non-reaction payload
//! kind; [`ReactionValidator`] layers the five-step ZK-proof pipeline on
//! top of the same structural-and-signature baseline. Both implement
//! `hn-registry`'s [`hn_registry::ContentValidator`] port so the
//! registry can dispatch to either uniformly.

pub mod domain;

pub use domain::{crypto_helpers, ReactionValidator, StructuralSignatureValidator};
