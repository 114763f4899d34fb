//! Request identification.
//!
//! # Responsibilities
//! - Name the request ID header shared by the layers and the handlers
//! - Read the ID back for handler-level logging
//!
//! # Design Decisions
//! - IDs are UUID v4, assigned by tower-http as the outermost layer
//! - A client-supplied x-request-id is kept, not replaced
//! - The ID is echoed on the response

use axum::http::HeaderMap;

pub const X_REQUEST_ID: &str = "x-request-id";

/// The request ID assigned to this request, or "unknown".
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_id_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");

        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }
}
