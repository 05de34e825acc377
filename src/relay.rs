use crate::upstream::{UpstreamResponse, is_hop_by_hop_header};
use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Turns a buffered upstream reply into the caller's response. Headers are
/// appended value by value before the body is attached; the content type is
/// always declared as JSON.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let UpstreamResponse {
        status,
        headers,
        body,
    } = upstream;

    let mut builder = Response::builder().status(status);
    if let Some(out) = builder.headers_mut() {
        for (name, value) in &headers {
            // framing belongs to our own transport
            if is_hop_by_hop_header(name)
                || name == header::CONTENT_LENGTH
                || name == header::CONTENT_TYPE
            {
                continue;
            }
            out.append(name.clone(), value.clone());
        }
        out.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    builder
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
