//! Product API
//!
//! Entry point for the product catalog service. Wires configuration, the
//! SQLite pool, the metrics recorder and the HTTP router, then serves until
//! a shutdown signal arrives.

use product_api::config::Config;
use product_api::observability::{self, emitter::AgentSink, emitter::MetricSink};
use product_api::routes::{self, AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Product API");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        max_db_connections = config.max_db_connections,
        request_timeout_seconds = config.request_timeout_seconds,
        metrics_enabled = config.metrics_enabled,
        "Configuration loaded successfully"
    );

    // Install the metrics recorder. A missing backend is never fatal: the
    // service continues with a detached emitter and every emission becomes
    // a no-op.
    let (metric_sink, metrics_handle): (Arc<dyn MetricSink>, _) = if config.metrics_enabled {
        match observability::init_metrics_recorder() {
            Ok(handle) => {
                info!("Metrics recorder installed; /metrics endpoint enabled");
                (Arc::new(AgentSink::attached()), Some(handle))
            }
            Err(e) => {
                warn!(error = %e, "Metrics recorder unavailable; continuing detached");
                (Arc::new(AgentSink::detached()), None)
            }
        }
    } else {
        info!("Metrics reporting disabled by configuration");
        (Arc::new(AgentSink::detached()), None)
    };

    // Initialize database connection pool
    info!("Connecting to database...");
    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(config.max_db_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    info!("Database connection established");

    // Apply migrations on startup so a fresh database is usable immediately
    sqlx::migrate!("../../migrations").run(&db_pool).await?;
    info!("Database schema up to date");

    // Parse bind address before moving config
    let bind_address = config.bind_address.clone();

    // Create application state
    let state = Arc::new(AppState {
        pool: db_pool,
        config,
        metric_sink,
    });

    // Build application routes
    let app = routes::build_routes(state, metrics_handle);

    // Parse bind address
    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Product API listening on {}", addr);

    // Start server with graceful shutdown support
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Product API shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
