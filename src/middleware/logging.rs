//! Request logging middleware.
//!
//! Logs every HTTP request with method, route, status code, and latency.
//! Only the route template is logged: concrete paths can carry secrets such as reset tokens.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Span};

/// Logged in place of paths that matched no route
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Route template (`/api/v1/orders/:id`) the request was dispatched to
pub fn route_of<B>(request: &Request<B>) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or(UNMATCHED_ROUTE)
}

/// Span for `TraceLayer::make_span_with`; carries the route template, never the URI
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::debug_span!(
        "http_request",
        method = %request.method(),
        route = %route_of(request),
    )
}

fn is_health(uri: &Uri) -> bool {
    uri.path() == "/health"
}

/// Logs each request once it completes.
///
/// INFO for 2xx/3xx, INFO with a distinct message for 4xx, WARN for 5xx.
/// `/health` is not logged.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    if is_health(request.uri()) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let route = route_of(&request).to_string();

    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    if status >= 500 {
        warn!(
            method = %method,
            route = %route,
            status = status,
            latency_ms = latency.as_millis(),
            "Request failed (5xx)"
        );
    } else if status >= 400 {
        info!(
            method = %method,
            route = %route,
            status = status,
            latency_ms = latency.as_millis(),
            "Request rejected (4xx)"
        );
    } else {
        info!(
            method = %method,
            route = %route,
            status = status,
            latency_ms = latency.as_millis(),
            "Request completed"
        );
    }

    response
}
