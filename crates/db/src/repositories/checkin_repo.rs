//! Repository for the `checkins` table.

use sqlx::PgPool;
use smartqueue_core::types::{DbId, Timestamp};

use crate::models::checkin::{Checkin, CreateCheckin, CHECKIN_ACTIVE, CHECKIN_COMPLETED};

const COLUMNS: &str =
    "id, user_id, location_id, location_name, entry_time, exit_time, status, created_at";

/// Provides presence-tracking operations.
///
/// The `uq_checkins_active_per_user` partial index backs the handler-level
/// conflict checks: even under a race, the store admits at most one active
/// check-in per user.
pub struct CheckinRepo;

impl CheckinRepo {
    /// Open a new active check-in, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCheckin) -> Result<Checkin, sqlx::Error> {
        let query = format!(
            "INSERT INTO checkins (user_id, location_id, location_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checkin>(&query)
            .bind(input.user_id)
            .bind(&input.location_id)
            .bind(&input.location_name)
            .fetch_one(pool)
            .await
    }

    /// Find the user's active check-in at a specific location.
    pub async fn find_active(
        pool: &PgPool,
        user_id: DbId,
        location_id: &str,
    ) -> Result<Option<Checkin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkins
             WHERE user_id = $1 AND location_id = $2 AND status = $3"
        );
        sqlx::query_as::<_, Checkin>(&query)
            .bind(user_id)
            .bind(location_id)
            .bind(CHECKIN_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Find the user's active check-in anywhere.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Checkin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkins WHERE user_id = $1 AND status = $2"
        );
        sqlx::query_as::<_, Checkin>(&query)
            .bind(user_id)
            .bind(CHECKIN_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Mark a check-in completed with the given exit time. Returns the
    /// updated row, or `None` if no active row matched.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        exit_time: Timestamp,
    ) -> Result<Option<Checkin>, sqlx::Error> {
        let query = format!(
            "UPDATE checkins SET status = $2, exit_time = $3
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checkin>(&query)
            .bind(id)
            .bind(CHECKIN_COMPLETED)
            .bind(exit_time)
            .bind(CHECKIN_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Complete every active check-in at a location. Used when an admin
    /// deletes the location. Returns the count of closed check-ins.
    pub async fn complete_all_at_location(
        pool: &PgPool,
        location_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE checkins SET status = $2, exit_time = now()
             WHERE location_id = $1 AND status = $3",
        )
        .bind(location_id)
        .bind(CHECKIN_COMPLETED)
        .bind(CHECKIN_ACTIVE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
