//! Live update routing infrastructure.
//!
//! The [`SnapshotRouter`] subscribes to the event bus and pushes fresh
//! location snapshots to every WebSocket client whenever occupancy changes,
//! plus targeted frames to the user who triggered ticket or check-in events.

pub mod router;
pub mod snapshot;

pub use router::SnapshotRouter;
