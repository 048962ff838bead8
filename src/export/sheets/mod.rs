//! Export to a tab of a Google spreadsheet.
//!
//! The tab is named after the entity. If it does not exist it is created
//! first; the rows are then written starting at cell `A1` with the
//! `USER_ENTERED` input option, so numeric strings become numbers.
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_data::export::{RemoteSheetSink, SheetsCredential, ExportTarget};
//! use forge_data::{ForgeConfig, SpreadsheetId};
//!
//! let credential = SheetsCredential::load("token.json".as_ref())?;
//! let sink = RemoteSheetSink::new(
//!     &ForgeConfig::default(),
//!     &credential,
//!     SpreadsheetId::new("1AbCdEf")?,
//! )?;
//! let target = ExportTarget::RemoteSheet(sink);
//! ```

mod client;
mod credential;
mod errors;

pub use client::{RangeUpdate, SheetsClient, VALUE_INPUT_OPTION};
pub use credential::{refresh_credential, SheetsCredential, SHEETS_SCOPE};
pub use errors::{CredentialError, SheetsError};

use crate::config::{ForgeConfig, SpreadsheetId};
use crate::export::{ExportError, ExportKind, ExportOutcome, ExportSink, ExportSource};

/// Writes the flattened rows to a Google Sheets tab.
#[derive(Debug)]
pub struct RemoteSheetSink {
    client: SheetsClient,
    spreadsheet_id: SpreadsheetId,
}

impl RemoteSheetSink {
    /// Creates a sink for `spreadsheet_id`, authorized with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the HTTP client cannot be created.
    pub fn new(
        config: &ForgeConfig,
        credential: &SheetsCredential,
        spreadsheet_id: SpreadsheetId,
    ) -> Result<Self, SheetsError> {
        if credential.expired() {
            tracing::warn!("sheets credential has expired; the export will likely be rejected");
        }
        Ok(Self {
            client: SheetsClient::new(config, credential)?,
            spreadsheet_id,
        })
    }

    /// Returns the target spreadsheet.
    #[must_use]
    pub const fn spreadsheet_id(&self) -> &SpreadsheetId {
        &self.spreadsheet_id
    }
}

impl ExportSink for RemoteSheetSink {
    fn kind(&self) -> ExportKind {
        ExportKind::RemoteSheet
    }

    async fn write(&self, source: &ExportSource<'_>) -> Result<ExportOutcome, ExportError> {
        let rows = source.require_rows(self.kind())?;
        let tab = source.entity.as_str();
        let id = &self.spreadsheet_id;

        let tab_created = if self.client.tab_exists(id, tab).await? {
            false
        } else {
            self.client.create_tab(id, tab).await?;
            true
        };

        let update = self
            .client
            .write_range(id, &format!("{tab}!A1"), rows.rows())
            .await?;
        tracing::info!(
            spreadsheet = %id,
            tab,
            updated_cells = update.updated_cells,
            "wrote rows to sheet"
        );

        Ok(ExportOutcome {
            kind: self.kind(),
            destination: format!("{id}/{tab}"),
            rows_written: rows.len(),
            updated_cells: Some(update.updated_cells),
            tab_created,
        })
    }
}
