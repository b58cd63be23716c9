use axum::{
    body::Body,
    http::{HeaderValue, Request, Response},
    middleware::Next,
};
use std::time::Instant;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID middleware for request tracking and logging
///
/// This middleware:
/// - Reuses the caller's `X-Request-ID` or generates a UUID v4
/// - Logs request start and completion with timing
/// - Echoes the request ID on the response
pub async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response<Body> {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&request_id).ok();
    match &header_value {
        Some(value) => {
            req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
        }
        None => tracing::warn!("Failed to create header value for request ID"),
    }

    let user_agent = req
        .headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // Path only; callback query strings carry codes and state
    tracing::info!(
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        user_agent = %user_agent,
        "Request started"
    );

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    tracing::info!(
        request_id = %request_id,
        status = %response.status(),
        elapsed_ms = elapsed.as_millis(),
        "Request completed"
    );

    response
}
