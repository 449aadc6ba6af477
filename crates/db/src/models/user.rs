//! User profile model and DTOs.

use sqlx::FromRow;
use smartqueue_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    /// Cumulative minutes saved; monotonically incremented.
    pub total_time_saved_mins: i32,
    pub total_queues_joined: i32,
    /// Single-location pointer: set while an active check-in exists.
    pub current_location_id: Option<String>,
    pub current_location_name: Option<String>,
    pub notifications_enabled: bool,
    pub share_presence: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

/// DTO for updating notification/privacy preference flags.
pub struct UpdatePreferences {
    pub notifications_enabled: Option<bool>,
    pub share_presence: Option<bool>,
}
