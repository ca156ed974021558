//! # Block Assembler
//!
//! Produces unsigned → signed → finalized blocks and commits them, one
//! at a time under a single commit lock, to the blockchain context.
//! Drives [`hn_cache::BlockchainCache`] forward and publishes
//! `BlockCreated` on [`hn_bus::EventPublisher`] once a block is durable.

pub mod domain;

pub use domain::BlockAssembler;
