use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assigns every request an id (propagating an incoming one), runs the
/// request inside a span carrying it, and echoes it back on the response.
pub async fn request_tracing_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        req.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!("request", %request_id, %method, %path);

    let mut response = next.run(req).instrument(span).await;

    tracing::debug!(
        %request_id,
        %method,
        %path,
        status = response.status().as_u16(),
        "request completed"
    );

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}
