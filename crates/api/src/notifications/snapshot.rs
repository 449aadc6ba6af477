//! Location snapshot frames pushed over WebSocket.

use axum::extract::ws::Message;
use serde::Serialize;
use smartqueue_core::status::{classify, occupancy_percent, StatusTier};
use smartqueue_core::types::LocationId;
use smartqueue_db::models::location::Location;
use smartqueue_db::repositories::LocationRepo;
use smartqueue_db::DbPool;

/// A location enriched with its derived occupancy percentage and status tier.
///
/// This is the shape clients render, both in REST responses and in WebSocket
/// snapshot frames. Status is always computed at read time so it can never
/// go stale relative to the stored occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct LocationView {
    pub id: LocationId,
    pub name: String,
    pub kind: String,
    pub current_occupancy: i32,
    pub max_capacity: i32,
    pub avg_wait_time_mins: i32,
    pub position_x: f64,
    pub position_y: f64,
    pub occupancy_percent: f64,
    pub status: StatusTier,
}

impl From<Location> for LocationView {
    fn from(loc: Location) -> Self {
        let percent = occupancy_percent(loc.current_occupancy, loc.max_capacity);
        let status = classify(loc.current_occupancy, loc.max_capacity);
        Self {
            id: loc.id,
            name: loc.name,
            kind: loc.kind,
            current_occupancy: loc.current_occupancy,
            max_capacity: loc.max_capacity,
            avg_wait_time_mins: loc.avg_wait_time_mins,
            position_x: loc.position_x,
            position_y: loc.position_y,
            occupancy_percent: percent,
            status,
        }
    }
}

/// Load all locations and build a `locations_snapshot` WebSocket text frame.
pub async fn snapshot_message(pool: &DbPool) -> Result<Message, sqlx::Error> {
    let locations: Vec<LocationView> = LocationRepo::list(pool)
        .await?
        .into_iter()
        .map(LocationView::from)
        .collect();

    let frame = serde_json::json!({
        "type": "locations_snapshot",
        "locations": locations,
        "timestamp": chrono::Utc::now(),
    });
    Ok(Message::Text(frame.to_string().into()))
}
