//! Route definitions for the `/admin` surface (all admin-only).

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /locations                 -> create_location
/// PUT    /locations/{id}            -> update_location
/// DELETE /locations/{id}            -> delete_location
/// GET    /locations/{id}/qr         -> get_qr
/// POST   /locations/{id}/qr/rotate  -> rotate_qr
/// GET    /admins                    -> list_admins
/// POST   /admins                    -> grant_admin
/// DELETE /admins/{user_id}          -> revoke_admin
/// GET    /demo                      -> demo_status
/// POST   /demo/start                -> start_demo
/// POST   /demo/stop                 -> stop_demo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", post(admin::create_location))
        .route(
            "/locations/{id}",
            put(admin::update_location).delete(admin::delete_location),
        )
        .route("/locations/{id}/qr", get(admin::get_qr))
        .route("/locations/{id}/qr/rotate", post(admin::rotate_qr))
        .route("/admins", get(admin::list_admins).post(admin::grant_admin))
        .route("/admins/{user_id}", delete(admin::revoke_admin))
        .route("/demo", get(admin::demo_status))
        .route("/demo/start", post(admin::start_demo))
        .route("/demo/stop", post(admin::stop_demo))
}
