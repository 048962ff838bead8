//! Error types for the Forge data engine.
//!
//! This module contains the configuration error type and the crate-level
//! [`ForgeError`] returned by the [`QueryEngine`](crate::engine::QueryEngine)
//! facade.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Each pipeline stage has its own error type
//! ([`QueryError`], [`GraphqlError`], [`NormalizeError`], [`ExportError`]);
//! [`ForgeError`] wraps them for callers that drive the whole pipeline.
//!
//! # Example
//!
//! ```rust
//! use forge_data::{ConfigError, EndpointUrl};
//!
//! let result = EndpointUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidEndpointUrl { .. })));
//! ```

use thiserror::Error;

use crate::clients::graphql::GraphqlError;
use crate::export::ExportError;
use crate::normalize::NormalizeError;
use crate::query::QueryError;

/// Errors that can occur while building a [`ForgeConfig`](crate::ForgeConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An endpoint URL is malformed.
    #[error("Invalid endpoint URL '{url}'. Expected an absolute http(s) URL (e.g., 'https://subgraph.example.com/subgraphs/name/forge').")]
    InvalidEndpointUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A spreadsheet identifier is empty or contains path separators.
    #[error("Invalid spreadsheet id '{id}'. Copy the id segment from the spreadsheet URL.")]
    InvalidSpreadsheetId {
        /// The invalid identifier that was provided.
        id: String,
    },

    /// The configured request timeout is zero.
    #[error("Request timeout must be greater than zero.")]
    ZeroTimeout,
}

/// Unified error for a full build → execute → normalise run.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The query could not be built from the caller's selection.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The subgraph call failed or returned an unusable envelope.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),

    /// The payload could not be turned into rows.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// An export target rejected the rows.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
