//! XLSX export.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::export::{ExportError, ExportKind, ExportOutcome, ExportSink, ExportSource};
use crate::normalize::TableRows;

/// Writes the flattened rows to a single-sheet workbook.
///
/// The worksheet is named after the entity and the first row is bold.
#[derive(Clone, Debug)]
pub struct SpreadsheetSink {
    path: PathBuf,
}

impl SpreadsheetSink {
    /// Creates a sink writing to `path`, replacing any existing file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_workbook(&self, sheet_name: &str, rows: &TableRows) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (row_idx, row) in rows.rows().iter().enumerate() {
            let row_num = u32::try_from(row_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num =
                    u16::try_from(col_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
                if row_num == 0 {
                    worksheet.write_string_with_format(row_num, col_num, cell, &header_format)?;
                } else {
                    worksheet.write_string(row_num, col_num, cell)?;
                }
            }
        }

        workbook.save(&self.path)?;
        Ok(())
    }
}

impl ExportSink for SpreadsheetSink {
    fn kind(&self) -> ExportKind {
        ExportKind::Spreadsheet
    }

    async fn write(&self, source: &ExportSource<'_>) -> Result<ExportOutcome, ExportError> {
        let rows = source.require_rows(self.kind())?;
        self.write_workbook(source.entity.as_str(), rows)?;

        Ok(ExportOutcome::file(
            self.kind(),
            self.path.display().to_string(),
            rows.len(),
        ))
    }
}
