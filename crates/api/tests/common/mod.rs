//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so tests
//! exercise the same middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery) that production uses.

#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use smartqueue_api::auth::jwt::JwtConfig;
use smartqueue_api::background::DemoSimulator;
use smartqueue_api::config::ServerConfig;
use smartqueue_api::router::build_app_router;
use smartqueue_api::state::AppState;
use smartqueue_api::ws::WsManager;
use smartqueue_core::roles::ROLE_ADMIN;
use smartqueue_db::models::location::CreateLocation;
use smartqueue_db::repositories::{AdminRepo, LocationRepo};
use smartqueue_events::EventBus;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        demo_tick_secs: 1,
        admin_email: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let simulator = Arc::new(DemoSimulator::new(
        pool.clone(),
        Arc::clone(&event_bus),
        config.demo_tick_secs,
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus,
        simulator,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };
    app.oneshot(request).await.expect("request should not fail")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Collect and parse a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Register a user through the API and return `(user_id, access_token)`.
pub async fn register_user(pool: &PgPool, email: &str) -> (i64, String) {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "email": email,
        "display_name": email.split('@').next().unwrap_or("user"),
        "password": "test_password_123!",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let user_id = json["user"]["id"].as_i64().expect("user id");
    let token = json["access_token"].as_str().expect("access token");
    (user_id, token.to_string())
}

/// Register a user and grant them the admin role marker directly.
pub async fn register_admin(pool: &PgPool, email: &str) -> (i64, String) {
    let (user_id, token) = register_user(pool, email).await;
    AdminRepo::grant(pool, user_id, ROLE_ADMIN)
        .await
        .expect("grant should succeed");
    (user_id, token)
}

/// Insert a location directly with a known entry token.
pub async fn create_location(
    pool: &PgPool,
    id: &str,
    occupancy: i32,
    capacity: i32,
    wait_mins: i32,
    qr_token: &str,
) -> smartqueue_db::models::location::Location {
    LocationRepo::create(
        pool,
        &CreateLocation {
            id: id.to_string(),
            name: format!("Location {id}"),
            kind: "cafe".to_string(),
            current_occupancy: occupancy,
            max_capacity: capacity,
            avg_wait_time_mins: wait_mins,
            position_x: 50.0,
            position_y: 50.0,
            entry_qr_code: qr_token.to_string(),
        },
    )
    .await
    .expect("location creation should succeed")
}
