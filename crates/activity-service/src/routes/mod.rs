//! HTTP routes for the Activity Service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::ActivityDirectory;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The activity catalog.
    pub directory: Arc<ActivityDirectory>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Redirect to `/static/index.html`
/// - `/activities` - Activity listing with optional search
/// - `/activities/:name/participants` - Roster lookup
/// - `/activities/:name/signup` - Signup (POST) and removal (DELETE)
/// - `/static/*` - Front-end assets from the configured directory
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - Request timeout from configuration
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_seconds);
    let static_files = ServeDir::new(&state.config.static_dir);

    let activity_routes = Router::new()
        .route("/", get(handlers::root_redirect))
        .route("/health", get(handlers::health_check))
        .route("/activities", get(handlers::list_activities))
        .route(
            "/activities/:name/participants",
            get(handlers::get_activity_participants),
        )
        .route(
            "/activities/:name/signup",
            post(handlers::signup_for_activity).delete(handlers::unsign_from_activity),
        )
        .nest_service("/static", static_files)
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TraceLayer - Log request details (innermost)
    // 2. TimeoutLayer - Bound the whole request
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    activity_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(http_metrics_middleware))
}
