use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Logs one line per request: method, URI, elapsed time, response status.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        "{} {} completed_in={:.2}ms status={}",
        method,
        uri,
        elapsed_ms,
        response.status().as_u16()
    );
    response
}
