//! Test server harness for E2E testing
//!
//! Provides `TestActivityServer` for spawning real Activity Service
//! instances in tests.

use activity_service::config::Config;
use activity_service::models::Catalog;
use activity_service::routes::{self, init_metrics_recorder, AppState};
use activity_service::services::ActivityDirectory;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Static front-end shipped at the workspace root.
pub const WORKSPACE_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../static");

/// Test harness for spawning the Activity Service in E2E tests.
///
/// Each instance owns its own catalog, so tests never observe each
/// other's signups.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_signup_e2e() -> Result<(), anyhow::Error> {
///     let server = TestActivityServer::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .post(format!("{}/activities/Chess%20Club/signup", server.url()))
///         .query(&[("email", "ava@mergington.edu")])
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestActivityServer {
    addr: SocketAddr,
    config: Config,
    directory: Arc<ActivityDirectory>,
    _handle: JoinHandle<()>,
}

impl TestActivityServer {
    /// Spawn a server holding the initial school catalog.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_directory(ActivityDirectory::seeded()).await
    }

    /// Spawn a server holding a custom catalog.
    pub async fn spawn_with_catalog(
        activities: Catalog,
    ) -> Result<Self, anyhow::Error> {
        Self::spawn_with_directory(ActivityDirectory::new(activities)).await
    }

    /// Spawn a new test server instance.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Serve the workspace `static/` directory
    /// - Start the HTTP server in the background
    async fn spawn_with_directory(directory: ActivityDirectory) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("STATIC_DIR".to_string(), WORKSPACE_STATIC_DIR.to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let directory = Arc::new(directory);
        let state = Arc::new(AppState {
            directory: Arc::clone(&directory),
            config: config.clone(),
        });

        // The global recorder can only be installed once per process. Later
        // servers get a standalone recorder instead.
        let metrics_handle = init_metrics_recorder()
            .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle());

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind(config.bind_address)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            directory,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Direct access to the catalog the server is using.
    pub fn directory(&self) -> &Arc<ActivityDirectory> {
        &self.directory
    }
}

impl Drop for TestActivityServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
