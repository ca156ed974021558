//! # Hush Network Event Bus
//!
//! The choreography pattern behind every cross-component handoff in the
//! node: chain foundation publishes `BlockchainInitialized`, the
//! scheduler reacts by driving the assembler, the assembler publishes
//! `BlockCreated`, and the indexing dispatcher reacts by running
//! strategies and publishing `BlockIndexCompleted`. No component calls
//! another directly — everything crosses this bus.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Component A │   publish()        │  Component B │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, NodeEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
