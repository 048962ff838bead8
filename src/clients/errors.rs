//! HTTP-level error types shared by the subgraph and Sheets clients.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: a non-2xx response from a remote service
//! - [`InvalidHttpRequestError`]: a request that failed validation before sending
//! - [`HttpError`]: unified error type covering both plus network failures
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_data::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("Remote error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// The message field holds a compact JSON object built from the response
/// body (`errors`, `error`, `error_description`, or `raw_body` when the
/// body was not JSON), plus the `request_id` when the server sent an
/// `X-Request-Id` header. The same id is kept in `error_reference`.
///
/// # Example
///
/// ```rust
/// use forge_data::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: r#"{"error":"Not found"}"#.to_string(),
///     error_reference: Some("abc-123".to_string()),
/// };
///
/// assert_eq!(error.to_string(), "HTTP 404: {\"error\":\"Not found\"}");
/// ```
#[derive(Debug, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx status code.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network, timeout, or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code when the failure was a remote response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_includes_status_code_in_message() {
        let error = HttpResponseError {
            code: 502,
            message: r#"{"raw_body":"Bad Gateway"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"HTTP 502: {"raw_body":"Bad Gateway"}"#);
    }

    #[test]
    fn test_http_response_error_keeps_request_id() {
        let error = HttpResponseError {
            code: 500,
            message: r#"{"error":"boom","request_id":"abc-123"}"#.to_string(),
            error_reference: Some("abc-123".to_string()),
        };
        assert_eq!(error.error_reference.as_deref(), Some("abc-123"));
        assert!(error.to_string().contains("abc-123"));
    }

    #[test]
    fn test_invalid_request_error_missing_body() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "post".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use post without specifying data.");
    }

    #[test]
    fn test_status_is_only_reported_for_responses() {
        let error = HttpError::Response(HttpResponseError {
            code: 403,
            message: "{}".to_string(),
            error_reference: None,
        });
        assert_eq!(error.status(), Some(403));

        let error = HttpError::InvalidRequest(InvalidHttpRequestError::MissingBody {
            method: "put".to_string(),
        });
        assert_eq!(error.status(), None);
    }
}
