//! HTTP metrics middleware.
//!
//! Captures every response, including framework-level ones produced before
//! a handler runs (404 for unknown routes, 405 for wrong methods, query
//! string rejections).

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Middleware that records method, normalized path, status and duration
/// for every request.
///
/// Applied as the outermost layer.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn handler_200() -> &'static str {
        "OK"
    }

    async fn handler_400() -> (StatusCode, &'static str) {
        (StatusCode::BAD_REQUEST, "Activity is full")
    }

    fn test_app() -> Router {
        Router::new()
            .route("/activities", get(handler_200))
            .route("/activities/:name/signup", get(handler_400))
            .layer(middleware::from_fn(http_metrics_middleware))
    }

    async fn status_for(uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request builder should succeed");

        test_app()
            .oneshot(request)
            .await
            .expect("request should succeed")
            .status()
    }

    #[tokio::test]
    async fn test_middleware_passes_success_through() {
        assert_eq!(status_for("/activities").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_middleware_passes_error_through() {
        assert_eq!(
            status_for("/activities/Chess%20Club/signup").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_middleware_sees_unrouted_requests() {
        assert_eq!(status_for("/nonexistent").await, StatusCode::NOT_FOUND);
    }
}
