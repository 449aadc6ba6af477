pub mod admin;
pub mod auth;
pub mod checkins;
pub mod health;
pub mod locations;
pub mod tickets;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket (optional ?token=)
///
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             profile (requires auth)
/// /auth/me/preferences                 update flags (requires auth)
///
/// /locations                           list with live status
/// /locations/suggestion                best-alternative recommendation
/// /locations/{id}                      single location
/// /locations/{id}/queue                join virtual queue (POST)
/// /locations/{id}/exit                 leave location (POST)
///
/// /tickets                             caller's tickets
/// /tickets/{id}                        cancel (DELETE, idempotent)
///
/// /checkins                            QR check-in (POST)
/// /checkins/current                    caller's active check-in
///
/// /admin/locations                     create (POST)
/// /admin/locations/{id}                update (PUT), delete (DELETE)
/// /admin/locations/{id}/qr             printable entry code
/// /admin/locations/{id}/qr/rotate      rotate entry token (POST)
/// /admin/admins                        list, grant (POST)
/// /admin/admins/{user_id}              revoke (DELETE)
/// /admin/demo                          simulator status
/// /admin/demo/start                    start simulator (POST)
/// /admin/demo/stop                     stop simulator (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint for live snapshots.
        .route("/ws", get(ws::ws_handler))
        // Authentication and profile.
        .nest("/auth", auth::router())
        // Public location surface (plus queue join / exit actions).
        .nest("/locations", locations::router())
        // Virtual-queue tickets.
        .nest("/tickets", tickets::router())
        // QR check-in and presence.
        .nest("/checkins", checkins::router())
        // Admin surface.
        .nest("/admin", admin::router())
}
