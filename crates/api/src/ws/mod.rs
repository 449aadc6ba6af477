//! WebSocket infrastructure for live occupancy updates.
//!
//! Browser clients connect once and receive a full location snapshot on
//! connect plus a fresh snapshot whenever any occupancy-affecting event
//! fires. Connection management, heartbeat pings, and the HTTP upgrade
//! handler live here.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
