//! Error types for subgraph query execution.
//!
//! A query either yields a [`Payload`](super::Payload) or fails in exactly
//! one of three ways, reported by [`GraphqlError::kind`]:
//!
//! - [`FailureKind::Transport`]: the request never produced a usable
//!   response (connect failure, timeout, non-2xx status)
//! - [`FailureKind::RemoteError`]: the envelope carried a non-empty
//!   top-level `errors` array
//! - [`FailureKind::NoData`]: the envelope had neither errors nor `data`
//!
//! # Example
//!
//! ```rust
//! use forge_data::clients::graphql::{FailureKind, GraphqlError};
//!
//! let error = GraphqlError::Remote {
//!     message: "Type `Query` has no field `poolz`".to_string(),
//! };
//! assert_eq!(error.kind(), FailureKind::RemoteError);
//! assert_eq!(error.to_string(), "Type `Query` has no field `poolz`");
//! ```

use std::fmt;

use crate::clients::HttpError;
use thiserror::Error;

/// Message reported when the subgraph returns neither errors nor data.
pub const NO_DATA_MESSAGE: &str = "query returned no matching data";

/// Classification of a failed query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network failure, timeout, or non-2xx response.
    Transport,
    /// The subgraph reported errors.
    RemoteError,
    /// The subgraph returned no `data` object.
    NoData,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Transport => "transport",
            Self::RemoteError => "remote_error",
            Self::NoData => "no_data",
        };
        f.write_str(label)
    }
}

/// Error type for subgraph query execution.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// The HTTP exchange failed.
    #[error("Request to the subgraph failed: {0}")]
    Transport(#[from] HttpError),

    /// The subgraph answered with a non-empty `errors` array.
    ///
    /// Holds the first error's `message` verbatim.
    #[error("{message}")]
    Remote {
        /// Message of the first reported error.
        message: String,
    },

    /// The subgraph answered without `data`.
    #[error("{}", NO_DATA_MESSAGE)]
    NoData,
}

impl GraphqlError {
    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Remote { .. } => FailureKind::RemoteError,
            Self::NoData => FailureKind::NoData,
        }
    }
}
