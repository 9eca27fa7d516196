use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::Router;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{Level, Span};

/// Wrap the router in a request span keyed by the matched route template,
/// so ids in paths do not explode log cardinality.
pub fn add_tracing(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<_>| {
                let method = req.method().clone();
                let route = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_else(|| req.uri().path().to_string());
                tracing::span!(Level::INFO, "http", %method, %route)
            })
            .on_response(|res: &Response<_>, latency: Duration, _span: &Span| {
                let status = res.status();
                let elapsed_ms = latency.as_millis() as u64;
                if status.is_server_error() {
                    tracing::warn!(%status, elapsed_ms, "response");
                } else {
                    tracing::info!(%status, elapsed_ms, "response");
                }
            }),
    )
}
