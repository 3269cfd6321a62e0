use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Log every request with its outcome, at a level matching the status class.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();
    if status.is_server_error() {
        tracing::error!(%method, %uri, %status, duration_ms, "request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %uri, %status, duration_ms, "request rejected");
    } else {
        tracing::info!(%method, %uri, %status, duration_ms, "request completed");
    }

    response
}
