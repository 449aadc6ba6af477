//! Route definitions for the `/checkins` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::checkins;
use crate::state::AppState;

/// Routes mounted at `/checkins` (all require auth).
///
/// ```text
/// POST /          -> check_in (scanned QR payload)
/// GET  /current   -> current
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkins::check_in))
        .route("/current", get(checkins::current))
}
