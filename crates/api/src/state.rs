use std::sync::Arc;

use crate::background::DemoSimulator;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: smartqueue_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus feeding the snapshot router.
    pub event_bus: Arc<smartqueue_events::EventBus>,
    /// Admin-toggleable occupancy random-walk task.
    pub simulator: Arc<DemoSimulator>,
}
