//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register        -> register
/// POST /login           -> login
/// POST /refresh         -> refresh
/// POST /logout          -> logout (requires auth)
/// GET  /me              -> me (requires auth)
/// PUT  /me/preferences  -> update_preferences (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/me/preferences", put(auth::update_preferences))
}
