//! Periodic purge of expired refresh-token sessions.
//!
//! Spawns a background task that deletes rows from `user_sessions` whose
//! expiry has passed. Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use smartqueue_db::repositories::SessionRepo;
use smartqueue_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the session cleanup loop until `cancel` is triggered.
pub async fn run(pool: DbPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Session cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session cleanup: purged expired sessions");
                        } else {
                            tracing::debug!("Session cleanup: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session cleanup failed");
                    }
                }
            }
        }
    }
}
