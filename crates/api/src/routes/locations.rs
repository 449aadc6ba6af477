//! Route definitions for the public `/locations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{checkins, locations, tickets};
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// `/suggestion` must be registered before `/{id}` would otherwise capture it;
/// Axum resolves the literal segment first, but keeping it explicit here makes
/// the intent obvious.
///
/// ```text
/// GET  /                -> list
/// GET  /suggestion      -> suggestion
/// GET  /{id}            -> get
/// POST /{id}/queue      -> tickets::join (requires auth)
/// POST /{id}/exit       -> checkins::exit (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(locations::list))
        .route("/suggestion", get(locations::suggestion))
        .route("/{id}", get(locations::get))
        .route("/{id}/queue", post(tickets::join))
        .route("/{id}/exit", post(checkins::exit))
}
