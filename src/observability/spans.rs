//! Per-request spans.

use axum::body::Body;
use axum::http::Request;
use tracing::Span;

/// Span for one HTTP request, tagged with the `x-request-id` assigned at the
/// edge of the router.
pub fn make_request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        request_id = %request_id,
    )
}
