use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use smartqueue_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::notifications::snapshot;
use crate::state::AppState;

/// Query parameters accepted by the WebSocket upgrade endpoint.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Optional access token. When present and valid, the connection is
    /// bound to the user so targeted frames can reach them. An invalid
    /// token degrades to an anonymous connection rather than rejecting
    /// the upgrade.
    pub token: Option<String>,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager`, receives
/// an initial full location snapshot, and is managed by two tasks
/// (sender + receiver).
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let user_id = query
        .token
        .as_deref()
        .and_then(|token| validate_token(token, &state.config.jwt).ok())
        .map(|claims| claims.sub);

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Pushes an initial location snapshot so the client renders immediately.
///   3. Spawns a sender task that forwards messages from the manager channel.
///   4. Processes inbound messages on the current task.
///   5. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, user_id: Option<DbId>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = ?user_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = state.ws_manager.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    // Initial snapshot so a fresh client does not wait for the next event.
    match snapshot::snapshot_message(&state.pool).await {
        Ok(msg) => {
            if sink.send(msg).await.is_err() {
                state.ws_manager.remove(&conn_id).await;
                return;
            }
        }
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Failed to build initial snapshot");
        }
    }

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: clients only listen, so inbound frames are control-only.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
