//! Admin role-marker model.

use sqlx::FromRow;
use smartqueue_core::types::{DbId, Timestamp};

/// A row from the `admins` table mapping a user to a role marker.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct AdminRecord {
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}
