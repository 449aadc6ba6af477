//! HTTP-level integration tests for the public location surface:
//! listing with derived status, single fetch, and the suggestion endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_location, get};
use sqlx::PgPool;

/// Listed locations carry the derived occupancy percentage and status tier.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_locations_with_status(pool: PgPool) {
    create_location(&pool, "calm-cafe", 10, 100, 2, "tok-a").await;
    create_location(&pool, "busy-cafe", 60, 100, 12, "tok-b").await;
    create_location(&pool, "packed-cafe", 95, 100, 25, "tok-c").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/locations").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let locations = json["data"].as_array().expect("data should be an array");
    assert_eq!(locations.len(), 3);

    let by_id = |id: &str| {
        locations
            .iter()
            .find(|l| l["id"] == id)
            .unwrap_or_else(|| panic!("{id} missing"))
    };
    assert_eq!(by_id("calm-cafe")["status"], "safe");
    assert_eq!(by_id("busy-cafe")["status"], "busy");
    assert_eq!(by_id("packed-cafe")["status"], "crowded");
    assert_eq!(by_id("calm-cafe")["occupancy_percent"], 10.0);
    assert!(
        by_id("calm-cafe").get("entry_qr_code").is_none(),
        "the entry token must not leak through the public surface"
    );
}

/// Fetching a single location works; unknown ids are 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_location(pool: PgPool) {
    create_location(&pool, "solo-cafe", 40, 80, 6, "tok").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/locations/solo-cafe").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "solo-cafe");
    assert_eq!(json["data"]["occupancy_percent"], 50.0);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/locations/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

/// The canonical suggestion scenario: a quiet 10/100 cafe with a 2-minute
/// wait against a 95/100 one waiting 25 minutes saves 23 minutes.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_suggestion_scenario(pool: PgPool) {
    create_location(&pool, "quiet", 10, 100, 2, "tok-a").await;
    create_location(&pool, "packed", 95, 100, 25, "tok-b").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/locations/suggestion").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["location_id"], "quiet");
    assert_eq!(json["data"]["time_saved_mins"], 23);
    let message = json["data"]["message"].as_str().unwrap();
    assert!(message.contains("save 23 mins"), "got: {message}");
}

/// Excluding the caller's current location removes it from the candidates.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_suggestion_exclude(pool: PgPool) {
    create_location(&pool, "current", 5, 100, 1, "tok-a").await;
    create_location(&pool, "other", 30, 100, 10, "tok-b").await;
    create_location(&pool, "packed", 95, 100, 30, "tok-c").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/locations/suggestion?exclude=current").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["location_id"], "other");
}

/// Without a meaningful wait gap the endpoint returns null data.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_suggestion_suppressed_for_small_gap(pool: PgPool) {
    create_location(&pool, "a", 20, 100, 5, "tok-a").await;
    create_location(&pool, "b", 90, 100, 10, "tok-b").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/locations/suggestion").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::Value::Null);
}
