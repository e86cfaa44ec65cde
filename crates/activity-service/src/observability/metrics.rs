//! Metrics definitions for the Activity Service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `activity_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: parameterized paths, unknown paths collapse to `/other`
//! - `status`: success, error, timeout
//! - `operation`: signup, unsign
//! - `outcome`: success or an error kind

use metrics::counter;
use metrics::histogram;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used to
/// serve `/metrics`.
///
/// # Errors
///
/// Returns an error if a recorder is already installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("activity_http_request".to_string()),
            &[
                0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `activity_http_requests_total`, `activity_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("activity_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("activity_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=399 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion.
///
/// Activity names and asset paths are replaced with placeholders.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/activities" => "/activities",
        _ => normalize_dynamic_endpoint(path),
    }
}

fn normalize_dynamic_endpoint(path: &str) -> &'static str {
    if path.starts_with("/static/") {
        return "/static/{asset}";
    }

    // /activities/{name}/{action} splits into 4 parts
    if let Some(rest) = path.strip_prefix("/activities/") {
        let parts: Vec<&str> = rest.split('/').collect();
        if let [name, action] = parts.as_slice() {
            if !name.is_empty() {
                match *action {
                    "participants" => return "/activities/{name}/participants",
                    "signup" => return "/activities/{name}/signup",
                    _ => {}
                }
            }
        }
    }

    "/other"
}

// ============================================================================
// Enrollment Metrics
// ============================================================================

/// Record the outcome of a signup or removal.
///
/// Metric: `activity_enrollment_operations_total`
/// Labels: `operation` (signup, unsign), `outcome` (success, invalid_argument, not_found)
pub fn record_enrollment(operation: &'static str, outcome: &'static str) {
    counter!("activity_enrollment_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
