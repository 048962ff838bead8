//! Export error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::export::sheets::SheetsError;
use crate::export::ExportKind;

/// Errors that can occur while exporting results.
#[derive(Debug, Error)]
pub enum ExportError {
    /// There are no rows to write.
    #[error("No data to export to {kind}. Run a query that returns results first.")]
    NothingToExport {
        /// The sink that refused the empty table.
        kind: ExportKind,
    },

    /// A file could not be created or written.
    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The CSV writer failed.
    #[error("Failed to write CSV to '{}': {source}", .path.display())]
    Csv {
        /// The destination path.
        path: PathBuf,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// The XLSX writer failed.
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The payload could not be serialized.
    #[error("Failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The Sheets API call failed.
    #[error(transparent)]
    Sheets(#[from] SheetsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_export_names_the_sink() {
        let error = ExportError::NothingToExport {
            kind: ExportKind::Spreadsheet,
        };
        assert!(error.to_string().contains("xlsx"));
    }

    #[test]
    fn test_io_error_includes_path() {
        let error = ExportError::Io {
            path: PathBuf::from("/tmp/out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/tmp/out.json"));
        assert!(message.contains("denied"));
    }
}
