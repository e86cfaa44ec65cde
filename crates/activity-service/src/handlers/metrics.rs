//! Prometheus metrics endpoint handler.
//!
//! No student emails or activity names appear in metric labels.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Returns Prometheus-formatted metrics for scraping:
/// ```text
/// # TYPE activity_http_requests_total counter
/// activity_http_requests_total{method="GET",endpoint="/activities",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "activity.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[tokio::test]
    async fn test_metrics_handler_renders_standalone_recorder() {
        // A recorder that is never installed globally renders an empty page.
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let response = metrics_handler(State(handle)).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
