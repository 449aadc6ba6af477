//! Repository for the `admins` role-marker table.

use sqlx::PgPool;
use smartqueue_core::roles::ROLE_ADMIN;
use smartqueue_core::types::DbId;

use crate::models::admin::AdminRecord;

/// Provides admin role-marker operations.
pub struct AdminRepo;

impl AdminRepo {
    /// True only when a marker row exists with role = `admin`.
    ///
    /// This is the sole source of admin authorization; access tokens carry
    /// no role information, so revocation applies on the next request.
    pub async fn is_admin(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let role: Option<String> =
            sqlx::query_scalar("SELECT role FROM admins WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(role.as_deref() == Some(ROLE_ADMIN))
    }

    /// Grant (or update) a role marker for a user.
    pub async fn grant(
        pool: &PgPool,
        user_id: DbId,
        role: &str,
    ) -> Result<AdminRecord, sqlx::Error> {
        sqlx::query_as::<_, AdminRecord>(
            "INSERT INTO admins (user_id, role) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
             RETURNING user_id, role, created_at",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await
    }

    /// Remove a user's role marker. Returns `true` if a row was removed.
    pub async fn revoke(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admins WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all role markers.
    pub async fn list(pool: &PgPool) -> Result<Vec<AdminRecord>, sqlx::Error> {
        sqlx::query_as::<_, AdminRecord>(
            "SELECT user_id, role, created_at FROM admins ORDER BY created_at",
        )
        .fetch_all(pool)
        .await
    }
}
