//! CSV export.

use std::path::{Path, PathBuf};

use crate::export::{ExportError, ExportKind, ExportOutcome, ExportSink, ExportSource};

/// Writes the flattened rows as comma-separated text.
///
/// Fields containing commas, quotes or line breaks are quoted. Rows may
/// differ in length, which the composite wallet table relies on; an empty
/// separator row is written as a single empty field.
#[derive(Clone, Debug)]
pub struct DelimitedSink {
    path: PathBuf,
}

impl DelimitedSink {
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

    fn write_rows(&self, rows: &[Vec<String>]) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ExportSink for DelimitedSink {
    fn kind(&self) -> ExportKind {
        ExportKind::Delimited
    }

    async fn write(&self, source: &ExportSource<'_>) -> Result<ExportOutcome, ExportError> {
        let rows = source.require_rows(self.kind())?;

        self.write_rows(rows.rows())
            .map_err(|source| ExportError::Csv {
                path: self.path.clone(),
                source,
            })?;

        Ok(ExportOutcome::file(
            self.kind(),
            self.path.display().to_string(),
            rows.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::graphql::Payload;
    use crate::normalize::TableRows;
    use crate::schema::EntityName;

    fn table(rows: &[&[&str]]) -> TableRows {
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect::<Vec<Vec<String>>>()
            .into()
    }

    #[test]
    fn test_write_quotes_delimiters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.csv");
        let rows = table(&[&["id", "name"], &["0x1", "Forge, Inc."]]);
        let payload = Payload::new();
        let source = ExportSource::new(EntityName::Token, &payload, &rows);

        let outcome = tokio_test::block_on(DelimitedSink::new(&path).write(&source)).unwrap();
        assert_eq!(outcome.rows_written, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "id,name\n0x1,\"Forge, Inc.\"\n");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let rows = table(&[&["id"], &["0x1"]]);
        let payload = Payload::new();
        let source = ExportSource::new(EntityName::Pool, &payload, &rows);

        let result = tokio_test::block_on(DelimitedSink::new(&path).write(&source));
        assert!(matches!(result, Err(ExportError::Csv { .. })));
    }
}
