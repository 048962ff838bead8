//! The query engine facade used by front ends.
//!
//! [`QueryEngine`] ties the pipeline together: schema lookup, query
//! building, execution, flattening and export. It holds no per-query
//! state; every call is independent.
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_data::engine::QueryEngine;
//! use forge_data::query::QuerySpec;
//! use forge_data::schema::EntityName;
//! use forge_data::ForgeConfig;
//!
//! let engine = QueryEngine::new(ForgeConfig::default())?;
//! let spec = QuerySpec::new(EntityName::Pool).fields(["id", "volumeUSD"]).limit(10);
//! let payload = engine.build_and_run(&spec).await?;
//! let rows = engine.normalize(spec.entity, &payload)?;
//! ```

use crate::clients::graphql::{Payload, SubgraphClient};
use crate::config::ForgeConfig;
use crate::error::ForgeError;
use crate::export::{self, ExportError, ExportOutcome, ExportSource, ExportTarget};
use crate::normalize::{self, NormalizeError, TableRows};
use crate::query::{self, QueryDocument, QuerySpec};
use crate::schema::{self, EntityDescriptor, EntityName};

/// Entry point for running and exporting subgraph queries.
#[derive(Debug)]
pub struct QueryEngine {
    config: ForgeConfig,
    subgraph: SubgraphClient,
}

// Verify QueryEngine is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<QueryEngine>();
};

impl QueryEngine {
    /// Creates an engine for the endpoints in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Graphql`] if the HTTP client cannot be created.
    pub fn new(config: ForgeConfig) -> Result<Self, ForgeError> {
        let subgraph = SubgraphClient::new(&config).map_err(crate::clients::GraphqlError::from)?;
        Ok(Self { config, subgraph })
    }

    /// Returns the configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Lists every queryable entity with its fields.
    #[must_use]
    pub fn list_entities(&self) -> &'static [EntityDescriptor] {
        schema::list_entities()
    }

    /// Builds the document for `spec` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Query`] if the selection is invalid.
    pub fn build(&self, spec: &QuerySpec) -> Result<QueryDocument, ForgeError> {
        Ok(query::build(spec)?)
    }

    /// Builds the document for `spec` and executes it.
    ///
    /// Selection errors are reported before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Query`] for an invalid selection and
    /// [`ForgeError::Graphql`] for a failed execution.
    pub async fn build_and_run(&self, spec: &QuerySpec) -> Result<Payload, ForgeError> {
        let document = self.build(spec)?;
        Ok(self.subgraph.execute(&document).await?)
    }

    /// Flattens a payload into rows.
    ///
    /// # Errors
    ///
    /// See [`normalize::flatten`].
    pub fn normalize(&self, entity: EntityName, payload: &Payload) -> Result<TableRows, NormalizeError> {
        normalize::flatten(entity, payload)
    }

    /// Writes a query run to an export target.
    ///
    /// # Errors
    ///
    /// Returns the target's [`ExportError`].
    pub async fn export(
        &self,
        target: &ExportTarget,
        source: &ExportSource<'_>,
    ) -> Result<ExportOutcome, ExportError> {
        export::export(target, source).await
    }
}
