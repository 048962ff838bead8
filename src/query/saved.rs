//! Persisted query configurations.
//!
//! A saved query captures the operator's form state as JSON:
//!
//! ```json
//! {
//!   "entity": "Pool",
//!   "address": "0xabc",
//!   "limit": 100,
//!   "fields": { "volumeUSD": true, "id": true, "token0": false }
//! }
//! ```
//!
//! Selected fields come first, in selection order, followed by the
//! unselected ones; reloading rebuilds the fields in file order. Older files
//! store `limit` as text (`"100"`); both forms are accepted.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::query::{FilterAddress, QueryError, QuerySpec};
use crate::schema::{self, EntityName};

/// Errors raised while loading or saving a [`SavedQuery`].
#[derive(Debug, Error)]
pub enum SavedQueryError {
    /// The file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid query configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration describes an invalid query.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// The persisted form of a query selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    /// Entity the query targets.
    pub entity: EntityName,
    /// Address filter as entered; empty for none.
    #[serde(default)]
    pub address: String,
    /// Row limit.
    #[serde(deserialize_with = "deserialize_limit")]
    pub limit: u32,
    /// Checkbox state per field name, selected fields first in selection
    /// order.
    #[serde(default)]
    pub fields: IndexMap<String, bool>,
}

impl SavedQuery {
    /// Captures `spec` with one flag per schema field.
    ///
    /// The selected fields keep the order of `spec.fields`; unselected schema
    /// fields follow in schema order.
    #[must_use]
    pub fn from_spec(spec: &QuerySpec) -> Self {
        let mut fields: IndexMap<String, bool> = spec
            .fields
            .iter()
            .map(|name| (name.clone(), true))
            .collect();
        for name in schema::describe(spec.entity).field_names() {
            fields.entry(name.to_string()).or_insert(false);
        }

        Self {
            entity: spec.entity,
            address: spec
                .address
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            limit: spec.limit,
            fields,
        }
    }

    /// Rebuilds the [`QuerySpec`] this configuration describes.
    ///
    /// Selected fields keep their order in the file, so a saved selection
    /// rebuilds the same document it was saved from. Flags for names the
    /// entity does not have are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MalformedAddress`] if the stored address is not
    /// embeddable.
    pub fn to_spec(&self) -> Result<QuerySpec, QueryError> {
        let descriptor = schema::describe(self.entity);
        for name in self.fields.keys() {
            if !descriptor.has_field(name) {
                tracing::warn!(
                    entity = %self.entity,
                    field = %name,
                    "ignoring saved flag for unknown field"
                );
            }
        }

        let selected = self
            .fields
            .iter()
            .filter(|(name, selected)| **selected && descriptor.has_field(name))
            .map(|(name, _)| name.as_str());

        let mut spec = QuerySpec::new(self.entity).fields(selected).limit(self.limit);
        spec.address = FilterAddress::parse_optional(&self.address)?;
        Ok(spec)
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SavedQueryError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SavedQueryError> {
        let source = fs::read_to_string(path)?;
        let saved = serde_json::from_str(&source)?;
        tracing::info!(path = %path.display(), "query configuration loaded");
        Ok(saved)
    }

    /// Writes the configuration to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SavedQueryError`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SavedQueryError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), "query configuration saved");
        Ok(())
    }
}

fn deserialize_limit<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Limit {
        Number(u32),
        Text(String),
    }

    match Limit::deserialize(deserializer)? {
        Limit::Number(limit) => Ok(limit),
        Limit::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid limit '{text}'"))),
    }
}
