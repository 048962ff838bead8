//! Query construction for the Forge subgraph.
//!
//! This module turns an operator's selection into GraphQL text:
//!
//! - [`QuerySpec`]: entity, selected fields, optional address filter and limit
//! - [`FilterAddress`]: a validated address safe to embed in a query string
//! - [`build`]: produces a complete [`QueryDocument`] for a spec
//! - [`build_fragment`]: produces a splice-able [`QueryFragment`]
//! - [`build_wallet_overview`]: merges the swap and position sub-queries
//! - [`SavedQuery`]: the persisted form of a query configuration
//!
//! # Example
//!
//! ```rust
//! use forge_data::query::{self, FilterAddress, QuerySpec};
//! use forge_data::schema::EntityName;
//!
//! let spec = QuerySpec::new(EntityName::Pool)
//!     .fields(["id", "volumeUSD"])
//!     .address(FilterAddress::new("0xabc").unwrap())
//!     .limit(10);
//!
//! let document = query::build(&spec).unwrap();
//! assert_eq!(
//!     document.as_str(),
//!     r#"query { pools(first: 10, where: { id: "0xabc" }) { id volumeUSD } }"#
//! );
//! ```

mod address;
mod builder;
mod errors;
mod saved;

pub use address::FilterAddress;
pub use builder::{
    build, build_fragment, build_wallet_overview, QueryDocument, QueryFragment, QuerySpec,
    WalletOverviewSelection, DEFAULT_LIMIT, POSITION_OVERVIEW_FIELDS, SWAP_OVERVIEW_FIELDS,
};
pub use errors::QueryError;
pub use saved::{SavedQuery, SavedQueryError};
