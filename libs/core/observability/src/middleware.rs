//! Request metrics middleware.
//!
//! Requests are labelled by the route template (`/events/{id}`), never by the
//! concrete URI, so the number of series stays bounded by the route table.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Response, StatusCode},
    middleware::Next,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Route label for requests that matched no route (404 fallback, scanners).
pub const UNMATCHED_ROUTE: &str = "unmatched";

fn route_label(matched_path: Option<&MatchedPath>) -> String {
    matched_path.map_or_else(|| UNMATCHED_ROUTE.to_string(), |p| p.as_str().to_string())
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() / 100 {
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    }
}

/// Count requests and time them per method and route.
///
/// Emits `http_requests_total`, `http_request_duration_seconds` and, for 4xx
/// and 5xx responses, `http_requests_errors_total`.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let route = route_label(matched_path.as_ref());
    let method = request.method().as_str().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let code = status.as_u16().to_string();

    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "path" => route.clone()
    )
    .record(started.elapsed().as_secs_f64());

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => route.clone(),
        "status" => code.clone(),
        "status_class" => status_class(status)
    )
    .increment(1);

    if status.is_client_error() || status.is_server_error() {
        counter!(
            "http_requests_errors_total",
            "method" => method,
            "path" => route,
            "status" => code
        )
        .increment(1);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/events/{id}", get(|| async { "ok" }))
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn(metrics_middleware))
    }

    #[tokio::test]
    async fn test_middleware_labels_by_matched_path() {
        let handle = crate::init_metrics().unwrap();

        let response = app()
            .oneshot(
                Request::get("/events/665f1c2e9b1e8a3d4c5b6a79")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let rendered = handle.render();
        assert!(rendered.contains(r#"path="/events/{id}""#));
        assert!(!rendered.contains("665f1c2e9b1e8a3d4c5b6a79"));
    }

    #[tokio::test]
    async fn test_unknown_paths_share_one_series() {
        let handle = crate::init_metrics().unwrap();

        for i in 0..3 {
            let response = app()
                .oneshot(
                    Request::get(format!("/wp-admin/scan-{i}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), 404);
        }

        let rendered = handle.render();
        assert!(!rendered.contains("/wp-admin/scan-"));
        assert!(rendered.contains(r#"path="unmatched""#));
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(StatusCode::CREATED), "2xx");
        assert_eq!(status_class(StatusCode::NOT_FOUND), "4xx");
        assert_eq!(status_class(StatusCode::SERVICE_UNAVAILABLE), "5xx");
    }
}
