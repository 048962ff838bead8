//! # Forge Data
//!
//! A schema-driven query engine for the Forge DEX subgraph, with exports to
//! CSV, XLSX, JSON and Google Sheets.
//!
//! ## Overview
//!
//! The crate is a pipeline of small stages:
//!
//! 1. [`schema`]: the static table of entities and their queryable fields
//! 2. [`query`]: turns a [`QuerySpec`](query::QuerySpec) into GraphQL text
//! 3. [`clients::graphql`]: executes the document and classifies the response
//! 4. [`normalize`]: flattens the payload into rows of text cells
//! 5. [`export`]: writes the rows (or the raw payload) to a destination
//!
//! [`engine::QueryEngine`] wraps the pipeline for front ends such as the
//! `forge-data` command line tool.
//!
//! ## Quick Start
//!
//! ```rust
//! use forge_data::query::{self, QuerySpec};
//! use forge_data::schema::EntityName;
//!
//! let spec = QuerySpec::new(EntityName::Swap)
//!     .fields(["id", "amountUSD"])
//!     .limit(5);
//! let document = query::build(&spec).unwrap();
//! assert_eq!(document.as_str(), "query { swaps(first: 5) { id amountUSD } }");
//! ```
//!
//! ## Running a Query
//!
//! ```rust,ignore
//! use forge_data::engine::QueryEngine;
//! use forge_data::export::{DelimitedSink, ExportSource, ExportTarget};
//! use forge_data::query::{FilterAddress, QuerySpec};
//! use forge_data::schema::EntityName;
//! use forge_data::ForgeConfig;
//!
//! let engine = QueryEngine::new(ForgeConfig::default())?;
//! let spec = QuerySpec::all_fields(EntityName::Pool)
//!     .address(FilterAddress::new("0xpool")?);
//!
//! let payload = engine.build_and_run(&spec).await?;
//! let rows = engine.normalize(spec.entity, &payload)?;
//!
//! let target = ExportTarget::Delimited(DelimitedSink::new("pools.csv"));
//! engine
//!     .export(&target, &ExportSource::new(spec.entity, &payload, &rows))
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! Library code logs through [`tracing`]; install a subscriber to see the
//! outbound documents, response classifications and export results.

pub mod clients;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod normalize;
pub mod query;
pub mod schema;

// Re-export public types at crate root for convenience
pub use config::{EndpointUrl, ForgeConfig, ForgeConfigBuilder, SpreadsheetId};
pub use engine::QueryEngine;
pub use error::{ConfigError, ForgeError};

// Re-export HTTP client types
pub use clients::{
    FailureKind, GraphqlError, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, HttpResponseError, InvalidHttpRequestError, Payload,
    SubgraphClient,
};
