//! Repository for the `users` table.

use sqlx::PgPool;
use smartqueue_core::types::DbId;

use crate::models::user::{CreateUser, UpdatePreferences, User};

const COLUMNS: &str = "id, email, display_name, password_hash, total_time_saved_mins, \
                        total_queues_joined, current_location_id, current_location_name, \
                        notifications_enabled, share_presence, created_at, updated_at";

/// Provides user profile operations.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with zeroed counters, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Record a queue join: bump the join counter and credit the estimated
    /// minutes saved in one atomic statement.
    pub async fn record_queue_join(
        pool: &PgPool,
        user_id: DbId,
        time_saved_mins: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET total_queues_joined = total_queues_joined + 1,
                 total_time_saved_mins = total_time_saved_mins + $2,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(time_saved_mins)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Atomically credit minutes saved (exit flow).
    pub async fn credit_time_saved(
        pool: &PgPool,
        user_id: DbId,
        time_saved_mins: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET total_time_saved_mins = total_time_saved_mins + $2, updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(time_saved_mins)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Point the user's single-location pointer at a location.
    pub async fn set_current_location(
        pool: &PgPool,
        user_id: DbId,
        location_id: &str,
        location_name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET current_location_id = $2, current_location_name = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(location_id)
        .bind(location_name)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Clear the user's single-location pointer.
    pub async fn clear_current_location(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET current_location_id = NULL, current_location_name = NULL, updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Clear the pointer for every user currently at a location. Used when an
    /// admin deletes the location. Returns the count of affected users.
    pub async fn clear_current_location_at(
        pool: &PgPool,
        location_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET current_location_id = NULL, current_location_name = NULL, updated_at = now()
             WHERE current_location_id = $1",
        )
        .bind(location_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Update notification/privacy preference flags; unset fields keep their
    /// current value. Returns the updated row, or `None` if the user is gone.
    pub async fn update_preferences(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdatePreferences,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users
             SET notifications_enabled = COALESCE($2, notifications_enabled),
                 share_presence = COALESCE($3, share_presence),
                 updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(input.notifications_enabled)
            .bind(input.share_presence)
            .fetch_optional(pool)
            .await
    }
}
