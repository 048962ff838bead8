//! Query execution against the Forge subgraph.
//!
//! # Overview
//!
//! - [`SubgraphClient`]: posts a [`QueryDocument`](crate::query::QueryDocument)
//!   and classifies the response envelope
//! - [`GraphqlError`] / [`FailureKind`]: the three ways a query can fail
//! - [`Payload`]: the `data` object of a successful response
//!
//! # Response Classification
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. Transport failure (connect error, timeout, non-2xx status)
//! 2. Non-empty top-level `errors` array, even when `data` is also present
//! 3. Missing or null `data`
//!
//! Anything else is a success. There is no partial success.

mod client;
mod errors;

pub use client::SubgraphClient;
pub use errors::{FailureKind, GraphqlError, NO_DATA_MESSAGE};

/// The `data` object of a successful response: collection key → records.
///
/// Key order follows the response body.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Outcome of a single query execution.
pub type QueryResult = Result<Payload, GraphqlError>;
