//! Queue ticket model and DTOs.

use sqlx::FromRow;
use smartqueue_core::types::{DbId, LocationId, Timestamp};

/// A virtual-queue ticket row from the `tickets` table.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub user_id: DbId,
    pub location_id: LocationId,
    /// Denormalized snapshot of the location name at join time.
    pub location_name: String,
    /// Display estimate derived from occupancy at join time, not a
    /// serialized FIFO position.
    pub position_in_line: i32,
    pub estimated_time_mins: i32,
    /// `active` on creation; no transition rule drives `ready`/`completed`.
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new ticket.
pub struct CreateTicket {
    pub user_id: DbId,
    pub location_id: LocationId,
    pub location_name: String,
    pub position_in_line: i32,
    pub estimated_time_mins: i32,
}
