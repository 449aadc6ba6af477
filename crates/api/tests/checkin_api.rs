//! HTTP-level integration tests for the QR check-in / app-exit round trip:
//! payload validation, token matching, occupancy movement, the single
//! active check-in rule, and time-saved crediting.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_location, get, get_auth, post_auth, post_json_auth, register_user};
use sqlx::PgPool;

fn scan_body(location_id: &str, action: &str, token: &str) -> serde_json::Value {
    serde_json::json!({
        "payload": format!("smartqueue://scan/{location_id}/{action}/{token}")
    })
}

/// Full round trip: check in, observe occupancy and pointer, exit, observe
/// everything restored and time credited.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_checkin_exit_round_trip(pool: PgPool) {
    create_location(&pool, "canteen", 40, 100, 10, "tok-c").await;
    let (user_id, token) = register_user(&pool, "diner@campus.edu").await;

    // Check in by scanning the printed entry code.
    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("canteen", "entry", "tok-c"), &token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["location_id"], "canteen");
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["user_id"], user_id);

    // Occupancy went up by one.
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/locations/canteen").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_occupancy"], 41);

    // The profile points at the location.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_location_id"], "canteen");

    // The active check-in is visible.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/checkins/current", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["location_id"], "canteen");

    // Exit via the in-app button.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/locations/canteen/exit", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["checkin"]["status"], "completed");
    assert!(
        json["data"]["time_saved_mins"].as_i64().unwrap() >= 1,
        "exit always credits at least a minute"
    );

    // Occupancy is back, the pointer is cleared, no active check-in remains.
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/locations/canteen").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_occupancy"], 40);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_location_id"], serde_json::Value::Null);
    assert!(json["data"]["total_time_saved_mins"].as_i64().unwrap() >= 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/checkins/current", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::Value::Null);
}

/// A payload that does not match the grammar is a 400 with INVALID_FORMAT.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_malformed_payload(pool: PgPool) {
    let (_id, token) = register_user(&pool, "scanner@campus.edu").await;

    for payload in [
        "not-a-payload",
        "smartqueue://scan/loc-only",
        "otherapp://scan/canteen/entry/tok",
    ] {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "payload": payload });
        let response = post_json_auth(app, "/api/v1/checkins", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_FORMAT");
    }
}

/// A well-formed payload with the wrong token is 403 with INVALID_TOKEN.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_wrong_token(pool: PgPool) {
    create_location(&pool, "strict", 10, 100, 5, "real-token").await;
    let (_id, token) = register_user(&pool, "forger@campus.edu").await;

    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("strict", "entry", "stale"), &token)
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TOKEN");
}

/// Exit QR payloads are rejected: leaving is an in-app action.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_exit_payload_rejected(pool: PgPool) {
    create_location(&pool, "oneway", 10, 100, 5, "tok").await;
    let (_id, token) = register_user(&pool, "leaver@campus.edu").await;

    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("oneway", "exit", "tok"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Only one active check-in at a time, anywhere on campus.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_single_active_checkin(pool: PgPool) {
    create_location(&pool, "first", 10, 100, 5, "tok-1").await;
    create_location(&pool, "second", 10, 100, 5, "tok-2").await;
    let (_id, token) = register_user(&pool, "mover@campus.edu").await;

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("first", "entry", "tok-1"), &token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same place again: conflict.
    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("first", "entry", "tok-1"), &token)
            .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Different place: also conflict.
    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("second", "entry", "tok-2"), &token)
            .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // After exiting, checking in elsewhere works.
    let app = common::build_test_app(pool.clone());
    post_auth(app, "/api/v1/locations/first/exit", &token).await;

    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("second", "entry", "tok-2"), &token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Exiting a location without an active check-in there is 404: there is no
/// check-in resource to complete.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_exit_without_checkin_is_not_found(pool: PgPool) {
    create_location(&pool, "empty", 10, 100, 5, "tok").await;
    let (_id, token) = register_user(&pool, "ghost@campus.edu").await;

    let app = common::build_test_app(pool);
    let response = post_auth(app, "/api/v1/locations/empty/exit", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

/// Checking in does not touch queue tickets: only an explicit cancel
/// removes them.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_checkin_leaves_ticket_alone(pool: PgPool) {
    create_location(&pool, "queued", 10, 100, 8, "tok").await;
    let (_id, token) = register_user(&pool, "arriver@campus.edu").await;

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/locations/queued/queue", &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/checkins", scan_body("queued", "entry", "tok"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/tickets", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
