//! Repository for the `tickets` table.

use sqlx::PgPool;
use smartqueue_core::types::DbId;

use crate::models::ticket::{CreateTicket, Ticket};

const COLUMNS: &str =
    "id, user_id, location_id, location_name, position_in_line, estimated_time_mins, \
     status, created_at";

/// Provides queue-ticket operations.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new ticket, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets
                (user_id, location_id, location_name, position_in_line, estimated_time_mins)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.user_id)
            .bind(&input.location_id)
            .bind(&input.location_name)
            .bind(input.position_in_line)
            .bind(input.estimated_time_mins)
            .fetch_one(pool)
            .await
    }

    /// List a user's tickets, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a ticket owned by `user_id`. Returns `true` if a row was
    /// removed; deleting an absent ticket is a no-op, which makes the cancel
    /// operation idempotent.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
