//! Request ID middleware.
//!
//! Every request gets an ID: the `x-request-id` header when an upstream
//! proxy already assigned one, a fresh UUID v4 otherwise. The ID is
//! recorded on the current tracing span, tagged on the Sentry scope and
//! echoed back in the response headers.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ID supplied by an upstream proxy, if the header is present and valid.
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Ensure the request carries an ID and propagate it everywhere it is
/// useful for correlation.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_id_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));

        assert_eq!(incoming_request_id(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_or_empty_header_means_none() {
        assert!(incoming_request_id(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));
        assert!(incoming_request_id(&headers).is_none());
    }
}
