//! OAuth credential for the Sheets API.
//!
//! A [`SheetsCredential`] mirrors the "authorized user" token file written
//! by Google's client libraries:
//!
//! ```json
//! {
//!   "token": "ya29...",
//!   "refresh_token": "1//0g...",
//!   "token_uri": "https://oauth2.googleapis.com/token",
//!   "client_id": "123.apps.googleusercontent.com",
//!   "client_secret": "...",
//!   "scopes": ["https://www.googleapis.com/auth/spreadsheets"],
//!   "expiry": "2024-05-01T12:00:00Z"
//! }
//! ```
//!
//! The credential is passed explicitly to whoever needs it. Refreshing
//! never mutates in place; [`refresh_credential`] returns a new value that
//! the caller may [`save`](SheetsCredential::save).

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{EndpointUrl, ForgeConfig, DEFAULT_TOKEN_URI};
use crate::export::sheets::errors::CredentialError;

/// Scope requested for spreadsheet access.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Grant type for refresh token requests.
const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// An access token plus what is needed to refresh it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsCredential {
    /// The bearer access token.
    #[serde(default)]
    pub token: String,
    /// Long-lived refresh token, if one was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Endpoint that exchanges refresh tokens.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// OAuth client id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth client secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// When the access token stops being valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Successful response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Form body for a refresh request.
#[derive(Debug, Serialize)]
struct TokenRefreshRequest<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
    client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_secret: Option<&'a str>,
}

impl SheetsCredential {
    /// Creates a credential holding only an access token.
    ///
    /// Such a credential never expires locally and cannot be refreshed.
    #[must_use]
    pub fn from_access_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: None,
            token_uri: default_token_uri(),
            client_id: None,
            client_secret: None,
            scopes: vec![SHEETS_SCOPE.to_string()],
            expiry: None,
        }
    }

    /// Returns the bearer access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.token
    }

    /// Returns `true` if the access token has expired.
    ///
    /// Credentials without an expiry time are considered never expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expiry.is_some_and(|expiry| Utc::now() >= expiry)
    }

    /// Returns `true` if the token is non-empty and not expired.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.expired()
    }

    /// Returns `true` if [`refresh_credential`] can be attempted.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
            && self.client_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Reads a credential from an authorized-user token file.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Io`] or [`CredentialError::Json`].
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let text = std::fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the credential to `path` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Io`] or [`CredentialError::Json`].
    pub fn save(&self, path: &Path) -> Result<(), CredentialError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| CredentialError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Exchanges the credential's refresh token for a new access token.
///
/// Returns a new credential; the input is left untouched. The refresh
/// token is kept unless the endpoint issues a new one.
///
/// # Errors
///
/// - [`CredentialError::MissingRefreshToken`] if the credential has no
///   refresh token or client id
/// - [`CredentialError::Config`] if the token URI is not a valid endpoint
/// - [`CredentialError::RefreshFailed`] if the request fails or is rejected
pub async fn refresh_credential(
    config: &ForgeConfig,
    credential: &SheetsCredential,
) -> Result<SheetsCredential, CredentialError> {
    let (Some(refresh_token), Some(client_id)) = (
        credential.refresh_token.as_deref().filter(|t| !t.is_empty()),
        credential.client_id.as_deref().filter(|id| !id.is_empty()),
    ) else {
        return Err(CredentialError::MissingRefreshToken);
    };

    let token_uri = EndpointUrl::new(credential.token_uri.as_str())?;

    let request_body = TokenRefreshRequest {
        grant_type: REFRESH_TOKEN_GRANT_TYPE,
        refresh_token,
        client_id,
        client_secret: credential.client_secret.as_deref(),
    };

    let mut builder = reqwest::Client::builder().use_rustls_tls();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(|e| CredentialError::RefreshFailed {
        status: 0,
        message: format!("Failed to create HTTP client: {e}"),
    })?;

    tracing::debug!(token_uri = %token_uri, "refreshing sheets credential");
    let response = client
        .post(token_uri.as_ref())
        .form(&request_body)
        .send()
        .await
        .map_err(|e| CredentialError::RefreshFailed {
            status: 0,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(CredentialError::RefreshFailed {
            status,
            message: error_body,
        });
    }

    let token_response: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| CredentialError::RefreshFailed {
                status,
                message: format!("Failed to parse token response: {e}"),
            })?;

    tracing::info!("sheets credential refreshed");
    Ok(apply_token_response(credential, token_response))
}

fn apply_token_response(credential: &SheetsCredential, response: TokenResponse) -> SheetsCredential {
    let mut refreshed = credential.clone();
    refreshed.token = response.access_token;
    refreshed.expiry = response
        .expires_in
        .map(|seconds| Utc::now() + Duration::seconds(seconds));
    if let Some(refresh_token) = response.refresh_token {
        refreshed.refresh_token = Some(refresh_token);
    }
    if let Some(scope) = response.scope {
        refreshed.scopes = scope.split_whitespace().map(String::from).collect();
    }
    refreshed
}
