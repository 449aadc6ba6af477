use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartqueue_api::background::{session_cleanup, DemoSimulator};
use smartqueue_api::config::ServerConfig;
use smartqueue_api::notifications::SnapshotRouter;
use smartqueue_api::router::build_app_router;
use smartqueue_api::state::AppState;
use smartqueue_api::ws;
use smartqueue_db::repositories::AdminRepo;
use smartqueue_db::repositories::UserRepo;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartqueue_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = smartqueue_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    smartqueue_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    smartqueue_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // Seed the campus locations on first boot.
    let seeded = smartqueue_db::seed::seed_default_locations(&pool)
        .await
        .expect("Failed to seed default locations");
    if seeded > 0 {
        tracing::info!(seeded, "Seeded default locations");
    }

    // Bootstrap admin grant from ADMIN_EMAIL, if that account exists.
    if let Some(email) = &config.admin_email {
        bootstrap_admin(&pool, email).await;
    }

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());

    // --- Heartbeat ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus ---
    let event_bus = Arc::new(smartqueue_events::EventBus::default());
    tracing::info!("Event bus created");

    // Spawn the snapshot router (pushes live updates over WebSocket).
    let snapshot_router = SnapshotRouter::new(pool.clone(), Arc::clone(&ws_manager));
    let router_handle = tokio::spawn(snapshot_router.run(event_bus.subscribe()));

    // Spawn the session cleanup job.
    let cleanup_cancel = tokio_util::sync::CancellationToken::new();
    let cleanup_handle = tokio::spawn(session_cleanup::run(pool.clone(), cleanup_cancel.clone()));

    // --- Demo simulator (stopped until an admin starts it) ---
    let simulator = Arc::new(DemoSimulator::new(
        pool.clone(),
        Arc::clone(&event_bus),
        config.demo_tick_secs,
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        simulator: Arc::clone(&simulator),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    // Stop the demo walk first so occupancy stops changing.
    simulator.stop().await;

    // Stop the session cleanup job.
    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(shutdown_timeout, cleanup_handle).await;
    tracing::info!("Session cleanup job stopped");

    // Drop every remaining event bus handle to close the broadcast channel,
    // which signals the snapshot router to shut down. The simulator holds
    // one, so it goes first.
    drop(simulator);
    drop(event_bus);
    let _ = tokio::time::timeout(shutdown_timeout, router_handle).await;
    tracing::info!("Snapshot router shut down");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Grant the admin role marker to the configured bootstrap email.
///
/// A missing account is not an error: the grant happens on a later boot once
/// the user has registered.
async fn bootstrap_admin(pool: &smartqueue_db::DbPool, email: &str) {
    match UserRepo::find_by_email(pool, email).await {
        Ok(Some(user)) => {
            match AdminRepo::grant(pool, user.id, smartqueue_core::roles::ROLE_ADMIN).await {
                Ok(_) => tracing::info!(user_id = user.id, "Bootstrap admin granted"),
                Err(e) => tracing::error!(error = %e, "Bootstrap admin grant failed"),
            }
        }
        Ok(None) => {
            tracing::warn!(email, "ADMIN_EMAIL account not registered yet, skipping grant");
        }
        Err(e) => tracing::error!(error = %e, "Bootstrap admin lookup failed"),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
