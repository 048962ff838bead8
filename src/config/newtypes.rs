//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated absolute `http` or `https` endpoint URL.
///
/// Trailing slashes are removed so that paths can be appended with a single
/// `/` separator.
///
/// # Example
///
/// ```rust
/// use forge_data::EndpointUrl;
///
/// let url = EndpointUrl::new("https://sheets.googleapis.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://sheets.googleapis.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "sheets.googleapis.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl EndpointUrl {
    /// Creates a new validated endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpointUrl`] if the URL has no
    /// `http`/`https` scheme, no host, or contains whitespace.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidEndpointUrl { url: url.clone() };

        if url.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for EndpointUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for EndpointUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated remote spreadsheet identifier.
///
/// The identifier is embedded in request paths, so it must be non-empty and
/// free of `/`, `?`, `#` and whitespace.
///
/// # Example
///
/// ```rust
/// use forge_data::SpreadsheetId;
///
/// let id = SpreadsheetId::new(" 1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms ").unwrap();
/// assert_eq!(id.as_ref(), "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms");
/// assert!(SpreadsheetId::new("a/b").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpreadsheetId(String);

impl SpreadsheetId {
    /// Creates a new validated spreadsheet identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSpreadsheetId`] if the identifier is
    /// empty or contains characters that would change the request path.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into().trim().to_string();
        let is_valid = !id.is_empty()
            && !id
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'));
        if !is_valid {
            return Err(ConfigError::InvalidSpreadsheetId { id });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for SpreadsheetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpreadsheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
