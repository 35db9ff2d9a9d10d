//! Request logging middleware with request ids and timing

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, info, warn};

/// Log every request under a span carrying a request id
///
/// The id comes from the `X-Request-ID` header when the client sends one,
/// otherwise a fresh one is generated.
pub async fn request_logging(mut request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request_id = request
        .headers()
        .get("X-Request-ID")
        .and_then(|h| h.to_str().ok())
        .map_or_else(generate_request_id, String::from);

    // Handlers can read the start time for their own timing
    request.extensions_mut().insert(start_time);

    let span = tracing::info_span!(
        "request",
        method = %method,
        uri = %uri,
        request_id = %request_id,
    );

    async move {
        let response = next.run(request).await;
        let elapsed = start_time.elapsed();
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            warn!(status = %status, elapsed = ?elapsed, "request completed with error");
        } else {
            info!(status = %status, elapsed = ?elapsed, "request completed");
        }

        response
    }
    .instrument(span)
    .await
}

/// Generate a unique request id for tracing
fn generate_request_id() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    format!("req_{:016x}", rng.r#gen::<u64>())
}
