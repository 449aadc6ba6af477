//! Event-to-WebSocket routing engine.
//!
//! [`SnapshotRouter`] subscribes to the queue event bus and converts each
//! event into WebSocket traffic: occupancy-affecting events trigger a full
//! location snapshot broadcast, and user-scoped events (tickets, check-ins,
//! profile changes) are pushed only to the connections of the acting user.

use std::sync::Arc;

use axum::extract::ws::Message;
use smartqueue_core::types::DbId;
use smartqueue_db::DbPool;
use smartqueue_events::QueueEvent;
use tokio::sync::broadcast;

use crate::notifications::snapshot;
use crate::ws::WsManager;

/// Routes queue events to connected WebSocket clients.
pub struct SnapshotRouter {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

impl SnapshotRouter {
    /// Create a new router with the given database pool and WebSocket manager.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](smartqueue_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<QueueEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Dropped events are harmless: the next snapshot carries
                    // the full current state anyway.
                    tracing::warn!(skipped = n, "Snapshot router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, snapshot router shutting down");
                    break;
                }
            }
        }
    }

    /// Route a single event to the appropriate connections.
    async fn route_event(&self, event: &QueueEvent) -> Result<(), sqlx::Error> {
        if event.affects_locations() {
            let msg = snapshot::snapshot_message(&self.pool).await?;
            self.ws_manager.broadcast(msg).await;
        }

        if let Some(user_id) = event.actor_user_id {
            self.deliver_to_actor(user_id, event).await;
        }

        Ok(())
    }

    /// Push a user-scoped frame to every connection bound to the actor.
    ///
    /// Anonymous connections never see these frames, so one user's ticket
    /// and check-in activity stays invisible to everyone else.
    async fn deliver_to_actor(&self, user_id: DbId, event: &QueueEvent) {
        let frame = serde_json::json!({
            "type": "user_event",
            "event_type": event.event_type,
            "location_id": event.location_id,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });
        let ws_msg = Message::Text(frame.to_string().into());
        let sent = self.ws_manager.send_to_user(user_id, ws_msg).await;
        tracing::debug!(
            user_id,
            event_type = %event.event_type,
            connections = sent,
            "Delivered user event"
        );
    }
}
