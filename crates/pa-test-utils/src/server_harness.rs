//! Test server harness for E2E testing
//!
//! Provides `TestServer` for spawning real Product API server instances in
//! tests, wired to a recording metric emitter so tests can assert on the
//! exact emissions a request produced.

use metrics_exporter_prometheus::PrometheusBuilder;
use product_api::config::Config;
use product_api::observability::emitter::MetricSink;
use product_api::observability::testing::RecordingSink;
use product_api::routes::{self, AppState};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the Product API server in E2E tests.
///
/// The server binds to a random available port and runs in the background
/// until the harness is dropped.
pub struct TestServer {
    addr: SocketAddr,
    recording: Option<Arc<RecordingSink>>,
    _server: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a test server wired to a fresh `RecordingSink`.
    ///
    /// # Arguments
    /// * `pool` - Database connection pool (typically from `#[sqlx::test]`)
    pub async fn spawn(pool: SqlitePool) -> Result<Self, anyhow::Error> {
        let sink = Arc::new(RecordingSink::new());
        Self::spawn_inner(pool, sink.clone(), Some(sink)).await
    }

    /// Spawn a test server with an arbitrary metric sink (e.g. a
    /// `FailingSink` to simulate a backend outage).
    pub async fn spawn_with_sink(
        pool: SqlitePool,
        sink: Arc<dyn MetricSink>,
    ) -> Result<Self, anyhow::Error> {
        Self::spawn_inner(pool, sink, None).await
    }

    async fn spawn_inner(
        pool: SqlitePool,
        sink: Arc<dyn MetricSink>,
        recording: Option<Arc<RecordingSink>>,
    ) -> Result<Self, anyhow::Error> {
        // Build configuration for the test environment
        let vars = HashMap::from([
            ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        // Standalone recorder handle so the /metrics route exists without
        // fighting over the process-global recorder slot.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let state = Arc::new(AppState {
            pool,
            config,
            metric_sink: sink,
        });

        // Build routes using the service's real route builder
        let app = routes::build_routes(state, Some(metrics_handle));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("test server should not fail");
        });

        Ok(Self {
            addr,
            recording,
            _server: server,
        })
    }

    /// Base URL of the running server, e.g. `http://127.0.0.1:49152`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The recording sink this server emits into.
    ///
    /// # Panics
    ///
    /// Panics if the server was spawned with `spawn_with_sink`.
    pub fn sink(&self) -> Arc<RecordingSink> {
        self.recording
            .clone()
            .expect("server was spawned without a recording sink")
    }
}
