//! # Node Runtime
//!
//! The composition root: builds every `hn-*` component into one
//! running node. The binary entry point (`main.rs`) only loads
//! configuration, initializes telemetry, and calls into here.

pub mod composition;
pub mod config;

pub use composition::Node;
pub use config::NodeConfig;
