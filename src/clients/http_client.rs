//! Async HTTP client shared by the subgraph executor and the Sheets sink.
//!
//! Every request is attempted exactly once. Failures surface to the caller
//! as [`HttpError`] so the executor can classify them.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{EndpointUrl, ForgeConfig};

/// Crate version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client bound to a single base URL.
///
/// The client handles:
/// - URL construction from the base URL and a relative path
/// - Default headers including User-Agent and an optional bearer token
/// - JSON body parsing with a `raw_body` fallback
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use forge_data::clients::{HttpClient, HttpMethod, HttpRequest};
/// use forge_data::ForgeConfig;
///
/// let config = ForgeConfig::default();
/// let client = HttpClient::new(config.subgraph_url(), &config, None)?;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "")
///     .body(serde_json::json!({ "query": "query { pools(first: 1) { id } }" }))
///     .build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for `base_url`.
    ///
    /// The request timeout and User-Agent prefix come from `config`. When
    /// `bearer_token` is given, every request carries an
    /// `Authorization: Bearer <token>` header.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client
    /// cannot be created (for example a TLS initialization failure).
    pub fn new(
        base_url: &EndpointUrl,
        config: &ForgeConfig,
        bearer_token: Option<&str>,
    ) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Forge Data v{CLIENT_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        if let Some(token) = bearer_token.filter(|token| !token.is_empty()) {
            default_headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.as_ref().to_string(),
            default_headers,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Builds the absolute URL for a relative request path.
    fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Sends a request and returns the parsed response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error or timeout occurs (`Network`)
    /// - A non-2xx response is received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url_for(&request.path);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
        };
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(method = %request.http_method, %url, "sending request");
        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let body = Self::parse_body(&body_text);

        let response = HttpResponse::new(code, res_headers, body);
        if response.is_ok() {
            return Ok(response);
        }

        tracing::debug!(status = code, %url, "request failed");
        Err(HttpError::Response(HttpResponseError {
            code,
            message: Self::serialize_error(&response),
            error_reference: response.request_id().map(String::from),
        }))
    }

    fn parse_body(body_text: &str) -> serde_json::Value {
        if body_text.trim().is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(body_text)
            .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Serializes an error response to a compact JSON message.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        for key in ["errors", "error", "raw_body"] {
            if let Some(value) = response.body.get(key) {
                error_body.insert(key.to_string(), value.clone());
            }
        }
        if response.body.get("error").is_some() {
            if let Some(desc) = response.body.get("error_description") {
                error_body.insert("error_description".to_string(), desc.clone());
            }
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert("request_id".to_string(), serde_json::json!(request_id));
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint(url: &str) -> EndpointUrl {
        EndpointUrl::new(url).unwrap()
    }

    #[test]
    fn test_client_construction() {
        let config = ForgeConfig::default();
        let client = HttpClient::new(&endpoint("https://graph.example.com/forge"), &config, None)
            .unwrap();

        assert_eq!(client.base_url(), "https://graph.example.com/forge");
        assert!(client.default_headers().get("Authorization").is_none());
    }

    #[test]
    fn test_user_agent_header_format() {
        let config = ForgeConfig::default();
        let client = HttpClient::new(config.subgraph_url(), &config, None).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Forge Data v"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ForgeConfig::builder()
            .user_agent_prefix("Reports/2.0")
            .build()
            .unwrap();
        let client = HttpClient::new(config.subgraph_url(), &config, None).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Reports/2.0 | Forge Data v"));
    }

    #[test]
    fn test_bearer_token_header_injection() {
        let config = ForgeConfig::default();
        let client =
            HttpClient::new(config.sheets_api_url(), &config, Some("ya29.token")).unwrap();

        assert_eq!(
            client.default_headers().get("Authorization").map(String::as_str),
            Some("Bearer ya29.token")
        );
    }

    #[test]
    fn test_empty_bearer_token_is_ignored() {
        let config = ForgeConfig::default();
        let client = HttpClient::new(config.sheets_api_url(), &config, Some("")).unwrap();
        assert!(client.default_headers().get("Authorization").is_none());
    }

    #[test]
    fn test_url_for_joins_paths() {
        let config = ForgeConfig::default();
        let client =
            HttpClient::new(&endpoint("https://sheets.example.com"), &config, None).unwrap();

        assert_eq!(client.url_for(""), "https://sheets.example.com");
        assert_eq!(
            client.url_for("/v4/spreadsheets/abc"),
            "https://sheets.example.com/v4/spreadsheets/abc"
        );
    }

    #[test]
    fn test_parse_body_falls_back_to_raw_body() {
        assert_eq!(HttpClient::parse_body(""), json!({}));
        assert_eq!(HttpClient::parse_body(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(
            HttpClient::parse_body("Bad Gateway"),
            json!({"raw_body": "Bad Gateway"})
        );
    }

    #[test]
    fn test_serialize_error_includes_request_id() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["req-9".to_string()]);
        let response = HttpResponse::new(
            401,
            headers,
            json!({"error": "invalid_grant", "error_description": "expired"}),
        );

        let message = HttpClient::serialize_error(&response);
        assert!(message.contains("invalid_grant"));
        assert!(message.contains("expired"));
        assert!(message.contains(r#""request_id":"req-9""#));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
