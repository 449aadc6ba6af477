//! Location model and DTOs.

use sqlx::FromRow;
use smartqueue_core::suggestion::LocationStats;
use smartqueue_core::types::{LocationId, Timestamp};

/// A location row from the `locations` table.
///
/// `status` is intentionally absent: it is derived from
/// `current_occupancy` / `max_capacity` on every read.
#[derive(Debug, Clone, FromRow)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// One of `canteen`, `library`, `office`, `cafe`.
    pub kind: String,
    pub current_occupancy: i32,
    pub max_capacity: i32,
    pub avg_wait_time_mins: i32,
    /// Map placement, percentage coordinates.
    pub position_x: f64,
    pub position_y: f64,
    /// Opaque rotating token embedded in the printed entry QR code.
    pub entry_qr_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Location {
    /// Snapshot view consumed by the suggestion scorer.
    pub fn stats(&self) -> LocationStats {
        LocationStats {
            id: self.id.clone(),
            name: self.name.clone(),
            current_occupancy: self.current_occupancy,
            max_capacity: self.max_capacity,
            avg_wait_time_mins: self.avg_wait_time_mins,
        }
    }
}

/// DTO for inserting a new location.
pub struct CreateLocation {
    pub id: LocationId,
    pub name: String,
    pub kind: String,
    pub current_occupancy: i32,
    pub max_capacity: i32,
    pub avg_wait_time_mins: i32,
    pub position_x: f64,
    pub position_y: f64,
    pub entry_qr_code: String,
}

/// DTO for partial location updates; `None` fields are left unchanged.
#[derive(Default)]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub max_capacity: Option<i32>,
    pub avg_wait_time_mins: Option<i32>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}
