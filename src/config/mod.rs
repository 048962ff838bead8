//! Configuration types for the Forge data engine.
//!
//! This module provides the configuration used to reach the subgraph and the
//! remote spreadsheet service.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ForgeConfig`]: The configuration struct holding endpoint and HTTP settings
//! - [`ForgeConfigBuilder`]: A builder for constructing [`ForgeConfig`] instances
//! - [`EndpointUrl`]: A validated absolute http(s) URL
//! - [`SpreadsheetId`]: A validated remote spreadsheet identifier
//!
//! # Example
//!
//! ```rust
//! use forge_data::{ForgeConfig, EndpointUrl};
//!
//! let config = ForgeConfig::builder()
//!     .subgraph_url(EndpointUrl::new("https://subgraph.example.com/subgraphs/name/forge").unwrap())
//!     .user_agent_prefix("ForgeDesk/1.0")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.subgraph_url().host_name(), "subgraph.example.com");
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{EndpointUrl, SpreadsheetId};

use crate::error::ConfigError;

/// The Forge DEX subgraph queried when no endpoint is configured.
pub const DEFAULT_SUBGRAPH_URL: &str = "https://subgraph.evmos.org/subgraphs/name/forge-subgraph";

/// Base URL of the Google Sheets API.
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// OAuth token endpoint used to refresh spreadsheet credentials.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Configuration for the Forge data engine.
///
/// # Thread Safety
///
/// `ForgeConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use forge_data::ForgeConfig;
///
/// let config = ForgeConfig::default();
/// assert!(config.subgraph_url().as_ref().ends_with("forge-subgraph"));
/// assert!(config.request_timeout().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ForgeConfig {
    subgraph_url: EndpointUrl,
    sheets_api_url: EndpointUrl,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
}

impl ForgeConfig {
    /// Creates a new builder for constructing a `ForgeConfig`.
    #[must_use]
    pub fn builder() -> ForgeConfigBuilder {
        ForgeConfigBuilder::new()
    }

    /// Returns the GraphQL endpoint queries are posted to.
    #[must_use]
    pub const fn subgraph_url(&self) -> &EndpointUrl {
        &self.subgraph_url
    }

    /// Returns the base URL of the spreadsheet API.
    #[must_use]
    pub const fn sheets_api_url(&self) -> &EndpointUrl {
        &self.sheets_api_url
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request timeout, if configured.
    ///
    /// `None` leaves the transport's defaults in place.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            subgraph_url: default_url(DEFAULT_SUBGRAPH_URL),
            sheets_api_url: default_url(DEFAULT_SHEETS_API_URL),
            user_agent_prefix: None,
            request_timeout: None,
        }
    }
}

fn default_url(url: &'static str) -> EndpointUrl {
    // The built-in constants are valid absolute URLs.
    EndpointUrl::new(url).unwrap_or_else(|_| unreachable!("invalid built-in URL {url}"))
}

// Verify ForgeConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ForgeConfig>();
};

/// Builder for constructing [`ForgeConfig`] instances.
///
/// # Defaults
///
/// - `subgraph_url`: [`DEFAULT_SUBGRAPH_URL`]
/// - `sheets_api_url`: [`DEFAULT_SHEETS_API_URL`]
/// - `user_agent_prefix`: `None`
/// - `request_timeout`: `None`
#[derive(Debug, Default)]
pub struct ForgeConfigBuilder {
    subgraph_url: Option<EndpointUrl>,
    sheets_api_url: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
}

impl ForgeConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GraphQL endpoint.
    #[must_use]
    pub fn subgraph_url(mut self, url: EndpointUrl) -> Self {
        self.subgraph_url = Some(url);
        self
    }

    /// Sets the spreadsheet API base URL.
    #[must_use]
    pub fn sheets_api_url(mut self, url: EndpointUrl) -> Self {
        self.sheets_api_url = Some(url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout applied to every HTTP request.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`ForgeConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] if a zero request timeout was set.
    pub fn build(self) -> Result<ForgeConfig, ConfigError> {
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ZeroTimeout);
        }

        let defaults = ForgeConfig::default();
        Ok(ForgeConfig {
            subgraph_url: self.subgraph_url.unwrap_or(defaults.subgraph_url),
            sheets_api_url: self.sheets_api_url.unwrap_or(defaults.sheets_api_url),
            user_agent_prefix: self.user_agent_prefix,
            request_timeout: self.request_timeout,
        })
    }
}
