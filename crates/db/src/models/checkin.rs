//! Check-in model and DTOs.

use sqlx::FromRow;
use smartqueue_core::types::{DbId, LocationId, Timestamp};

/// Status value for an open check-in.
pub const CHECKIN_ACTIVE: &str = "active";
/// Status value after exit.
pub const CHECKIN_COMPLETED: &str = "completed";

/// A presence record from the `checkins` table.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct Checkin {
    pub id: DbId,
    pub user_id: DbId,
    pub location_id: LocationId,
    pub location_name: String,
    pub entry_time: Timestamp,
    pub exit_time: Option<Timestamp>,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for opening a new check-in.
pub struct CreateCheckin {
    pub user_id: DbId,
    pub location_id: LocationId,
    pub location_name: String,
}
