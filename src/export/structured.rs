//! JSON export.

use std::path::{Path, PathBuf};

use crate::export::{ExportError, ExportKind, ExportOutcome, ExportSink, ExportSource};

/// Writes the unflattened payload as pretty-printed JSON.
#[derive(Clone, Debug)]
pub struct StructuredSink {
    path: PathBuf,
}

impl StructuredSink {
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
}

impl ExportSink for StructuredSink {
    fn kind(&self) -> ExportKind {
        ExportKind::Structured
    }

    async fn write(&self, source: &ExportSource<'_>) -> Result<ExportOutcome, ExportError> {
        let text = serde_json::to_string_pretty(source.payload)?;
        std::fs::write(&self.path, text).map_err(|source| ExportError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(ExportOutcome::file(
            self.kind(),
            self.path.display().to_string(),
            0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::graphql::Payload;
    use crate::normalize::TableRows;
    use crate::schema::EntityName;
    use serde_json::json;

    #[test]
    fn test_payload_written_even_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overview.json");
        let payload: Payload = json!({ "swaps": [], "positions": [] })
            .as_object()
            .cloned()
            .unwrap();
        let rows = TableRows::default();
        let source = ExportSource::new(EntityName::WalletOverview, &payload, &rows);

        tokio_test::block_on(StructuredSink::new(&path).write(&source)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({ "swaps": [], "positions": [] }));
    }

    #[test]
    fn test_output_is_indented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pools.json");
        let payload: Payload = json!({ "pools": [{ "id": "0x1" }] })
            .as_object()
            .cloned()
            .unwrap();
        let rows = TableRows::default();
        let source = ExportSource::new(EntityName::Pool, &payload, &rows);

        tokio_test::block_on(StructuredSink::new(&path).write(&source)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"pools\": ["));
    }
}
