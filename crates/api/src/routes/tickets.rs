//! Route definitions for the `/tickets` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets` (all require auth).
///
/// ```text
/// GET    /      -> list_mine
/// DELETE /{id}  -> cancel (idempotent)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_mine))
        .route("/{id}", delete(tickets::cancel))
}
