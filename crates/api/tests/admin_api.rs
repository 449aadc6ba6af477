//! HTTP-level integration tests for the admin surface: location
//! provisioning, QR rotation, admin grants, and the demo simulator toggle.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_location, delete_auth, get, get_auth, post_auth, post_json_auth,
    put_json_auth, register_admin, register_user,
};
use sqlx::PgPool;

/// Admins can create locations; the slug id is derived from the name, the
/// response carries derived status, and a freshly generated entry token is
/// stored server-side.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_location(pool: PgPool) {
    let (_id, token) = register_admin(&pool, "boss@campus.edu").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": "New Canteen",
        "kind": "canteen",
        "max_capacity": 120,
        "avg_wait_time_mins": 7,
        "position_x": 25.0,
        "position_y": 75.0,
    });
    let response = post_json_auth(app, "/api/v1/admin/locations", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "new-canteen");
    assert_eq!(json["data"]["current_occupancy"], 0);
    assert_eq!(json["data"]["status"], "safe");

    // A printable entry code exists immediately.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/locations/new-canteen/qr", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let payload = json["data"]["payload"].as_str().unwrap();
    assert!(payload.starts_with("smartqueue://scan/new-canteen/entry/"));
}

/// Unknown kinds, names without a usable slug, and slug collisions are
/// rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_location_validation(pool: PgPool) {
    create_location(&pool, "taken", 10, 100, 5, "tok").await;
    let (_id, token) = register_admin(&pool, "boss@campus.edu").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": "Weird",
        "kind": "stadium",
        "max_capacity": 100,
        "avg_wait_time_mins": 5,
        "position_x": 0.0,
        "position_y": 0.0,
    });
    let response = post_json_auth(app, "/api/v1/admin/locations", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": "???",
        "kind": "cafe",
        "max_capacity": 100,
        "avg_wait_time_mins": 5,
        "position_x": 0.0,
        "position_y": 0.0,
    });
    let response = post_json_auth(app, "/api/v1/admin/locations", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // "Taken!" slugifies to the already provisioned id.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "name": "Taken!",
        "kind": "cafe",
        "max_capacity": 100,
        "avg_wait_time_mins": 5,
        "position_x": 0.0,
        "position_y": 0.0,
    });
    let response = post_json_auth(app, "/api/v1/admin/locations", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Partial updates change only the provided fields.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_location(pool: PgPool) {
    create_location(&pool, "mutable", 30, 100, 5, "tok").await;
    let (_id, token) = register_admin(&pool, "boss@campus.edu").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "max_capacity": 60 });
    let response = put_json_auth(app, "/api/v1/admin/locations/mutable", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["max_capacity"], 60);
    assert_eq!(json["data"]["current_occupancy"], 30, "occupancy untouched");
    assert_eq!(json["data"]["occupancy_percent"], 50.0);
}

/// Deleting a location cleans up check-ins, pointers, and tickets.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_location_cleanup(pool: PgPool) {
    create_location(&pool, "doomed", 10, 100, 8, "tok-d").await;
    create_location(&pool, "survivor", 10, 100, 8, "tok-s").await;
    let (_a, inside_token) = register_user(&pool, "inside@campus.edu").await;
    let (_b, queued_token) = register_user(&pool, "queued@campus.edu").await;
    let (_c, admin_token) = register_admin(&pool, "boss@campus.edu").await;

    // One user is physically inside, another holds a ticket.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "payload": "smartqueue://scan/doomed/entry/tok-d" });
    let response = post_json_auth(app, "/api/v1/checkins", body, &inside_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/locations/doomed/queue", &queued_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/admin/locations/doomed", &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The location is gone.
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/locations/doomed").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The inside user was released and can check in elsewhere.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/auth/me", &inside_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_location_id"], serde_json::Value::Null);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "payload": "smartqueue://scan/survivor/entry/tok-s" });
    let response = post_json_auth(app, "/api/v1/checkins", body, &inside_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The ticket went with the location.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/tickets", &queued_token).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

/// Deleting an unknown location is a plain 404 and leaves existing presence
/// state untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_unknown_location_leaves_presence_alone(pool: PgPool) {
    create_location(&pool, "standing", 10, 100, 8, "tok-s").await;
    let (_a, user_token) = register_user(&pool, "inside@campus.edu").await;
    let (_b, admin_token) = register_admin(&pool, "boss@campus.edu").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "payload": "smartqueue://scan/standing/entry/tok-s" });
    let response = post_json_auth(app, "/api/v1/checkins", body, &user_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/admin/locations/ghost", &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The check-in and the user's location pointer survived.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/auth/me", &user_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_location_id"], "standing");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/checkins/current", &user_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["location_id"], "standing");
}

/// Rotating the entry QR invalidates previously printed codes.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_rotate_qr(pool: PgPool) {
    create_location(&pool, "rotating", 10, 100, 5, "old-token").await;
    let (_a, user_token) = register_user(&pool, "visitor@campus.edu").await;
    let (_b, admin_token) = register_admin(&pool, "boss@campus.edu").await;

    let app = common::build_test_app(pool.clone());
    let response = post_auth(
        app,
        "/api/v1/admin/locations/rotating/qr/rotate",
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_token = json["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(new_token, "old-token");

    // The old printed code stops working.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "payload": "smartqueue://scan/rotating/entry/old-token" });
    let response = post_json_auth(app, "/api/v1/checkins", body, &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The new one works.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "payload": format!("smartqueue://scan/rotating/entry/{new_token}")
    });
    let response = post_json_auth(app, "/api/v1/checkins", body, &user_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Granting and revoking the admin role marker takes effect immediately.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_grant_and_revoke_admin(pool: PgPool) {
    let (user_id, user_token) = register_user(&pool, "promoted@campus.edu").await;
    let (_admin, admin_token) = register_admin(&pool, "boss@campus.edu").await;

    // Grant by email.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "promoted@campus.edu" });
    let response = post_json_auth(app, "/api/v1/admin/admins", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The promoted user's existing token now opens the admin surface.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/admins", &user_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Revoke; access disappears on the next request.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/admin/admins/{user_id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/admins", &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Self-revocation is rejected.
    let app = common::build_test_app(pool.clone());
    let admin_id = {
        let app2 = common::build_test_app(pool.clone());
        let response = get_auth(app2, "/api/v1/auth/me", &admin_token).await;
        body_json(response).await["data"]["id"].as_i64().unwrap()
    };
    let response = delete_auth(app, &format!("/api/v1/admin/admins/{admin_id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Granting to an unknown email is 404.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "nobody@campus.edu" });
    let response = post_json_auth(app, "/api/v1/admin/admins", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The demo simulator toggles through its admin endpoints and actually
/// rewrites occupancy while running.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_demo_simulator_toggle(pool: PgPool) {
    create_location(&pool, "sim-cafe", 50, 100, 10, "tok").await;
    let (_id, admin_token) = register_admin(&pool, "boss@campus.edu").await;

    // Stopped by default.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/demo", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["running"], false);

    // The simulator task is owned by the app instance, so drive start,
    // status, and stop through one router.
    let app = common::build_test_app(pool.clone());

    let response = post_auth(app.clone(), "/api/v1/admin/demo/start", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["running"], true);

    let response = get_auth(app.clone(), "/api/v1/admin/demo", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["running"], true);

    // With a 1-second test tick, two sleeps guarantee at least one step.
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;

    let response = post_auth(app.clone(), "/api/v1/admin/demo/stop", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["running"], false);

    // Occupancy moved but stayed inside the demo clamp.
    let response = get(app, "/api/v1/locations/sim-cafe").await;
    let json = body_json(response).await;
    let occupancy = json["data"]["current_occupancy"].as_i64().unwrap();
    assert!((10..=98).contains(&occupancy), "got {occupancy}");
}
