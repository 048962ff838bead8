//! Export of query results to files and to Google Sheets.
//!
//! Every destination implements [`ExportSink`]. The set of destinations is
//! closed and enumerated by [`ExportTarget`]:
//!
//! | Target        | Sink                 | Reads                        |
//! |---------------|----------------------|------------------------------|
//! | `Delimited`   | [`DelimitedSink`]    | flattened rows (CSV)         |
//! | `Spreadsheet` | [`SpreadsheetSink`]  | flattened rows (XLSX)        |
//! | `Structured`  | [`StructuredSink`]   | the raw payload (JSON)       |
//! | `RemoteSheet` | [`RemoteSheetSink`]  | flattened rows (Sheets API)  |
//!
//! Tabular sinks refuse an empty table with
//! [`ExportError::NothingToExport`]. Each export is a single write; a
//! failure midway is reported once and never retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_data::export::{export, DelimitedSink, ExportSource, ExportTarget};
//! use forge_data::normalize::flatten;
//!
//! let rows = flatten(EntityName::Pool, &payload)?;
//! let source = ExportSource::new(EntityName::Pool, &payload, &rows);
//! let target = ExportTarget::Delimited(DelimitedSink::new("pools.csv"));
//! let outcome = export(&target, &source).await?;
//! println!("{outcome}");
//! ```

mod delimited;
mod errors;
pub mod sheets;
mod spreadsheet;
mod structured;

use std::fmt;
use std::future::Future;

pub use delimited::DelimitedSink;
pub use errors::ExportError;
pub use sheets::{CredentialError, RemoteSheetSink, SheetsClient, SheetsCredential, SheetsError};
pub use spreadsheet::SpreadsheetSink;
pub use structured::StructuredSink;

use crate::clients::graphql::Payload;
use crate::normalize::TableRows;
use crate::schema::EntityName;

/// The kind of destination a sink writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Comma-separated text file.
    Delimited,
    /// XLSX workbook file.
    Spreadsheet,
    /// Pretty-printed JSON file.
    Structured,
    /// Tab in a remote Google spreadsheet.
    RemoteSheet,
}

impl ExportKind {
    /// Returns a short lowercase label for logs and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delimited => "csv",
            Self::Spreadsheet => "xlsx",
            Self::Structured => "json",
            Self::RemoteSheet => "google-sheets",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a sink may need from one query run.
#[derive(Clone, Copy, Debug)]
pub struct ExportSource<'a> {
    /// The entity that was queried; names the XLSX worksheet and Sheets tab.
    pub entity: EntityName,
    /// The payload before flattening.
    pub payload: &'a Payload,
    /// The flattened rows.
    pub rows: &'a TableRows,
}

impl<'a> ExportSource<'a> {
    /// Bundles the pieces of a query run for export.
    #[must_use]
    pub const fn new(entity: EntityName, payload: &'a Payload, rows: &'a TableRows) -> Self {
        Self {
            entity,
            payload,
            rows,
        }
    }

    /// Returns the rows, or [`ExportError::NothingToExport`] if there are none.
    ///
    /// # Errors
    ///
    /// Fails when the table has no rows.
    pub fn require_rows(&self, kind: ExportKind) -> Result<&'a TableRows, ExportError> {
        if self.rows.is_empty() {
            return Err(ExportError::NothingToExport { kind });
        }
        Ok(self.rows)
    }
}

/// Result of a successful export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Which kind of sink produced this outcome.
    pub kind: ExportKind,
    /// File path or `spreadsheet/tab` the data went to.
    pub destination: String,
    /// Number of rows written; zero for the structured sink.
    pub rows_written: usize,
    /// Cells updated, as reported by the Sheets API.
    pub updated_cells: Option<u64>,
    /// Whether the Sheets tab had to be created first.
    pub tab_created: bool,
}

impl ExportOutcome {
    /// Builds the outcome of a file export.
    #[must_use]
    pub fn file(kind: ExportKind, destination: impl Into<String>, rows_written: usize) -> Self {
        Self {
            kind,
            destination: destination.into(),
            rows_written,
            updated_cells: None,
            tab_created: false,
        }
    }
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.updated_cells {
            Some(cells) => write!(f, "{cells} cells updated in {}", self.destination),
            None => write!(f, "Data exported to {}", self.destination),
        }
    }
}

/// A destination for query results.
pub trait ExportSink {
    /// Returns the kind of destination.
    fn kind(&self) -> ExportKind;

    /// Writes the source to the destination.
    fn write(
        &self,
        source: &ExportSource<'_>,
    ) -> impl Future<Output = Result<ExportOutcome, ExportError>> + Send;
}

/// The closed set of export destinations.
#[derive(Debug)]
pub enum ExportTarget {
    /// CSV file.
    Delimited(DelimitedSink),
    /// XLSX file.
    Spreadsheet(SpreadsheetSink),
    /// JSON file.
    Structured(StructuredSink),
    /// Google Sheets tab.
    RemoteSheet(RemoteSheetSink),
}

impl ExportSink for ExportTarget {
    fn kind(&self) -> ExportKind {
        match self {
            Self::Delimited(sink) => sink.kind(),
            Self::Spreadsheet(sink) => sink.kind(),
            Self::Structured(sink) => sink.kind(),
            Self::RemoteSheet(sink) => sink.kind(),
        }
    }

    async fn write(&self, source: &ExportSource<'_>) -> Result<ExportOutcome, ExportError> {
        match self {
            Self::Delimited(sink) => sink.write(source).await,
            Self::Spreadsheet(sink) => sink.write(source).await,
            Self::Structured(sink) => sink.write(source).await,
            Self::RemoteSheet(sink) => sink.write(source).await,
        }
    }
}

/// Writes `source` to `target`, logging the outcome.
///
/// # Errors
///
/// Returns the sink's [`ExportError`] unchanged.
pub async fn export(
    target: &ExportTarget,
    source: &ExportSource<'_>,
) -> Result<ExportOutcome, ExportError> {
    let kind = target.kind();
    match target.write(source).await {
        Ok(outcome) => {
            tracing::info!(
                %kind,
                entity = %source.entity,
                destination = %outcome.destination,
                rows = outcome.rows_written,
                "export finished"
            );
            Ok(outcome)
        }
        Err(error) => {
            tracing::error!(%kind, entity = %source.entity, %error, "export failed");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rows_rejects_empty_table() {
        let payload = Payload::new();
        let rows = TableRows::default();
        let source = ExportSource::new(EntityName::WalletOverview, &payload, &rows);

        assert!(matches!(
            source.require_rows(ExportKind::Delimited),
            Err(ExportError::NothingToExport {
                kind: ExportKind::Delimited
            })
        ));
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ExportOutcome::file(ExportKind::Delimited, "pools.csv", 3);
        assert_eq!(outcome.to_string(), "Data exported to pools.csv");

        let outcome = ExportOutcome {
            kind: ExportKind::RemoteSheet,
            destination: "abc/Pool".to_string(),
            rows_written: 2,
            updated_cells: Some(6),
            tab_created: true,
        };
        assert_eq!(outcome.to_string(), "6 cells updated in abc/Pool");
    }

    #[test]
    fn test_target_kind_dispatch() {
        let target = ExportTarget::Structured(StructuredSink::new("out.json"));
        assert_eq!(target.kind(), ExportKind::Structured);
        assert_eq!(ExportKind::RemoteSheet.to_string(), "google-sheets");
    }
}
