//! HTTP client layer for the subgraph and the Google Sheets API.
//!
//! # Overview
//!
//! - [`HttpClient`]: async HTTP client bound to one base URL
//! - [`HttpRequest`]: a request relative to that base URL
//! - [`HttpResponse`]: a parsed response
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PUT)
//! - [`graphql::SubgraphClient`]: executes query documents
//! - [`graphql::GraphqlError`]: classified query failures
//!
//! # Retry Behavior
//!
//! None. Every request is attempted once and a failure is terminal for
//! that call.

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, CLIENT_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;

pub use graphql::{FailureKind, GraphqlError, Payload, QueryResult, SubgraphClient};
