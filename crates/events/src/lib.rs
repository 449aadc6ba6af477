//! SmartQueue event bus.
//!
//! Provides the in-process publish/subscribe hub that drives live location
//! snapshots and targeted ticket/profile pushes:
//!
//! - [`EventBus`]: fan-out hub backed by `tokio::sync::broadcast`.
//! - [`QueueEvent`]: the canonical domain event envelope.
//! - [`names`]: dot-separated event name constants.

pub mod bus;

pub use bus::{names, EventBus, QueueEvent};
