//! HTTP response type.

use std::collections::HashMap;

/// A response from a remote service.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    ///
    /// Empty bodies become `{}`; bodies that are not JSON become
    /// `{"raw_body": "<text>"}`.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_for_2xx_only() {
        assert!(HttpResponse::new(200, HashMap::new(), json!({})).is_ok());
        assert!(HttpResponse::new(204, HashMap::new(), json!({})).is_ok());
        assert!(!HttpResponse::new(301, HashMap::new(), json!({})).is_ok());
        assert!(!HttpResponse::new(500, HashMap::new(), json!({})).is_ok());
    }

    #[test]
    fn test_request_id_reads_first_header_value() {
        let mut headers = HashMap::new();
        headers.insert(
            "x-request-id".to_string(),
            vec!["req-1".to_string(), "req-2".to_string()],
        );
        let response = HttpResponse::new(500, headers, json!({}));
        assert_eq!(response.request_id(), Some("req-1"));
    }

    #[test]
    fn test_request_id_absent() {
        let response = HttpResponse::new(200, HashMap::new(), json!({}));
        assert!(response.request_id().is_none());
    }
}
