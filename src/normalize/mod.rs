//! Flattening of query payloads into rows of text cells.
//!
//! [`flatten`] turns the `data` object returned by the subgraph into a
//! [`TableRows`] value: row 0 is the header, every following row is one
//! record. The composite `WalletOverview` entity produces labelled blocks
//! instead of a single table.
//!
//! # Cell Rendering
//!
//! | JSON value         | Cell text                 |
//! |--------------------|---------------------------|
//! | string             | the string, verbatim      |
//! | number / boolean   | its JSON text             |
//! | null / missing key | empty                     |
//! | object / array     | compact JSON text         |
//!
//! # Example
//!
//! ```rust
//! use forge_data::normalize::flatten;
//! use forge_data::schema::EntityName;
//! use serde_json::json;
//!
//! let payload = json!({
//!     "swaps": [
//!         { "id": "0x1", "amountUSD": "5.0" },
//!         { "id": "0x2", "amountUSD": "7.5" }
//!     ]
//! });
//! let payload = payload.as_object().unwrap();
//!
//! let table = flatten(EntityName::Swap, payload).unwrap();
//! assert_eq!(table.rows(), [
//!     vec!["id", "amountUSD"],
//!     vec!["0x1", "5.0"],
//!     vec!["0x2", "7.5"],
//! ]);
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::clients::graphql::Payload;
use crate::schema::EntityName;

/// Errors that can occur while flattening a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The collection is absent from the payload or holds no records.
    #[error("No results found for '{collection}'.")]
    EmptyResult {
        /// Collection key that was looked up.
        collection: String,
    },

    /// The collection is not an array of objects.
    #[error("Unexpected shape for '{collection}': expected an array of records.")]
    UnexpectedShape {
        /// Collection key that was looked up.
        collection: String,
    },
}

/// Ordered rows of text cells.
///
/// For plain entities row 0 is the header. Composite tables may contain
/// label rows and empty separator rows, so rows can differ in length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableRows {
    rows: Vec<Vec<String>>,
}

impl TableRows {
    /// Creates a table from raw rows.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns all rows, header included.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the first row, if any.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns the number of rows, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Consumes the table and returns its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

impl From<Vec<Vec<String>>> for TableRows {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Flattens a payload into rows for `entity`.
///
/// Plain entities read their single collection key. The header is taken
/// from the first record's keys in response order; later records are read
/// in that key order, so missing keys become empty cells and extra keys are
/// dropped.
///
/// `WalletOverview` emits, for `swaps` then `positions` when present and
/// non-empty: a label row (`Swaps` / `Positions`), a header row and the
/// body rows. An empty separator row follows the Swaps block. When neither
/// collection has records the table is empty.
///
/// # Errors
///
/// - [`NormalizeError::EmptyResult`] when a plain entity's collection is
///   absent or empty
/// - [`NormalizeError::UnexpectedShape`] when a collection is not an
///   array of objects
pub fn flatten(entity: EntityName, payload: &Payload) -> Result<TableRows, NormalizeError> {
    if entity.is_composite() {
        return flatten_wallet_overview(payload);
    }

    let collection = entity.collection_keys()[0];
    let records = records_of(payload, collection)?.ok_or_else(|| NormalizeError::EmptyResult {
        collection: collection.to_string(),
    })?;

    let mut table = TableRows::default();
    append_block(&mut table, records);
    Ok(table)
}

fn flatten_wallet_overview(payload: &Payload) -> Result<TableRows, NormalizeError> {
    let mut table = TableRows::default();

    if let Some(swaps) = records_of(payload, "swaps")? {
        table.push(vec!["Swaps".to_string()]);
        append_block(&mut table, swaps);
        table.push(Vec::new());
    }
    if let Some(positions) = records_of(payload, "positions")? {
        table.push(vec!["Positions".to_string()]);
        append_block(&mut table, positions);
    }

    Ok(table)
}

/// Returns the non-empty record list stored under `collection`.
fn records_of<'a>(
    payload: &'a Payload,
    collection: &str,
) -> Result<Option<Vec<&'a Map<String, Value>>>, NormalizeError> {
    let records = match payload.get(collection) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(records)) if records.is_empty() => return Ok(None),
        Some(Value::Array(records)) => records,
        Some(_) => {
            return Err(NormalizeError::UnexpectedShape {
                collection: collection.to_string(),
            })
        }
    };

    records
        .iter()
        .map(|record| {
            record
                .as_object()
                .ok_or_else(|| NormalizeError::UnexpectedShape {
                    collection: collection.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn append_block(table: &mut TableRows, records: Vec<&Map<String, Value>>) {
    let Some(first) = records.first() else {
        return;
    };
    let header: Vec<String> = first.keys().cloned().collect();

    let body: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            header
                .iter()
                .map(|key| record.get(key).map_or_else(String::new, render_cell))
                .collect()
        })
        .collect();

    table.push(header);
    for row in body {
        table.push(row);
    }
}

/// Renders one JSON value as cell text.
#[must_use]
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("test payload must be an object, got {other}"),
        }
    }

    #[test]
    fn test_render_cell_variants() {
        assert_eq!(render_cell(&json!("0xabc")), "0xabc");
        assert_eq!(render_cell(&json!(18)), "18");
        assert_eq!(render_cell(&json!(1.5)), "1.5");
        assert_eq!(render_cell(&json!(true)), "true");
        assert_eq!(render_cell(&Value::Null), "");
        assert_eq!(render_cell(&json!({ "id": "0x1" })), r#"{"id":"0x1"}"#);
        assert_eq!(render_cell(&json!(["a", 1])), r#"["a",1]"#);
    }

    #[test]
    fn test_flatten_keeps_response_key_order() {
        let data = payload(json!({
            "pools": [{ "volumeUSD": "10", "id": "0xp", "feeTier": "3000" }]
        }));
        let table = flatten(EntityName::Pool, &data).unwrap();
        assert_eq!(table.header().unwrap(), ["volumeUSD", "id", "feeTier"]);
        assert_eq!(table.rows()[1], ["10", "0xp", "3000"]);
    }

    #[test]
    fn test_flatten_nested_objects_become_json_text() {
        let data = payload(json!({
            "swaps": [{ "id": "0x1", "pool": { "id": "0xpool" } }]
        }));
        let table = flatten(EntityName::Swap, &data).unwrap();
        assert_eq!(table.rows()[1], ["0x1", r#"{"id":"0xpool"}"#]);
    }

    #[test]
    fn test_flatten_heterogeneous_records_follow_first_header() {
        let data = payload(json!({
            "tokens": [
                { "id": "0x1", "symbol": "FORGE" },
                { "id": "0x2", "name": "extra" }
            ]
        }));
        let table = flatten(EntityName::Token, &data).unwrap();
        assert_eq!(table.rows()[2], ["0x2", ""]);
    }

    #[test]
    fn test_flatten_missing_collection_is_empty_result() {
        let data = payload(json!({}));
        assert_eq!(
            flatten(EntityName::Factory, &data),
            Err(NormalizeError::EmptyResult {
                collection: "factorys".to_string()
            })
        );
    }

    #[test]
    fn test_flatten_empty_collection_is_empty_result() {
        let data = payload(json!({ "pooldaydatas": [] }));
        assert!(matches!(
            flatten(EntityName::PoolDayData, &data),
            Err(NormalizeError::EmptyResult { collection }) if collection == "pooldaydatas"
        ));
    }

    #[test]
    fn test_flatten_rejects_non_array_collection() {
        let data = payload(json!({ "pools": { "id": "0x1" } }));
        assert!(matches!(
            flatten(EntityName::Pool, &data),
            Err(NormalizeError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_wallet_overview_positions_only() {
        let data = payload(json!({
            "swaps": [],
            "positions": [{ "id": "0xpos", "liquidity": "42" }]
        }));
        let table = flatten(EntityName::WalletOverview, &data).unwrap();
        assert_eq!(
            table.rows(),
            [
                vec!["Positions".to_string()],
                vec!["id".to_string(), "liquidity".to_string()],
                vec!["0xpos".to_string(), "42".to_string()],
            ]
        );
    }

    #[test]
    fn test_wallet_overview_without_records_is_empty_table() {
        let data = payload(json!({ "swaps": [], "positions": [] }));
        let table = flatten(EntityName::WalletOverview, &data).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
    }

    #[test]
    fn test_table_width_is_longest_row() {
        let table = TableRows::from(vec![
            vec!["Swaps".to_string()],
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            Vec::new(),
        ]);
        assert_eq!(table.width(), 3);
        assert_eq!(table.len(), 3);
    }
}
