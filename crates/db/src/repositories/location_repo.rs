//! Repository for the `locations` table.

use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, kind, current_occupancy, max_capacity, avg_wait_time_mins, \
                        position_x, position_y, entry_qr_code, created_at, updated_at";

/// Provides CRUD and occupancy operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// List all locations, ordered by name. The observed cardinality is
    /// small (tens of locations), so there is no pagination.
    pub async fn list(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY name");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    /// Find a location by its slug id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count all locations. Used by the bootstrap seeder.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(pool)
            .await
    }

    /// Insert a new location, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations
                (id, name, kind, current_occupancy, max_capacity, avg_wait_time_mins,
                 position_x, position_y, entry_qr_code)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.current_occupancy)
            .bind(input.max_capacity)
            .bind(input.avg_wait_time_mins)
            .bind(input.position_x)
            .bind(input.position_y)
            .bind(&input.entry_qr_code)
            .fetch_one(pool)
            .await
    }

    /// Partially update a location; unset fields keep their current value.
    /// Returns `None` if the location does not exist.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($2, name),
                kind = COALESCE($3, kind),
                max_capacity = COALESCE($4, max_capacity),
                avg_wait_time_mins = COALESCE($5, avg_wait_time_mins),
                position_x = COALESCE($6, position_x),
                position_y = COALESCE($7, position_y),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.max_capacity)
            .bind(input.avg_wait_time_mins)
            .bind(input.position_x)
            .bind(input.position_y)
            .fetch_optional(pool)
            .await
    }

    /// Delete a location. Returns `true` if a row was removed.
    ///
    /// Associated tickets are voided by the FK cascade; check-in cleanup is
    /// the caller's responsibility (history rows carry no FK).
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically adjust the occupancy counter by `delta`, floored at zero.
    ///
    /// This is the only way occupancy changes outside demo mode: a single
    /// server-side increment, never a client-computed value written back.
    /// Returns the new occupancy, or `None` if the location does not exist.
    pub async fn adjust_occupancy(
        pool: &PgPool,
        id: &str,
        delta: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE locations
             SET current_occupancy = GREATEST(0, current_occupancy + $2),
                 updated_at = now()
             WHERE id = $1
             RETURNING current_occupancy",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(pool)
        .await
    }

    /// Replace the entry QR token. Returns the updated row, or `None` if the
    /// location does not exist.
    pub async fn rotate_entry_qr(
        pool: &PgPool,
        id: &str,
        token: &str,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET entry_qr_code = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite occupancy and wait time in one statement. Demo-simulator
    /// only; real flows go through [`Self::adjust_occupancy`].
    pub async fn set_demo_state(
        pool: &PgPool,
        id: &str,
        occupancy: i32,
        avg_wait_time_mins: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE locations
             SET current_occupancy = $2, avg_wait_time_mins = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(occupancy)
        .bind(avg_wait_time_mins)
        .execute(pool)
        .await?;
        Ok(())
    }
}
