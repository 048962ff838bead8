//! Minimal Google Sheets v4 client.

use serde_json::{json, Value};

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::config::{ForgeConfig, SpreadsheetId};
use crate::export::sheets::errors::SheetsError;
use crate::export::sheets::credential::SheetsCredential;

/// Value input option used for every write; cells are parsed as if typed.
pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// Summary of a `values.update` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeUpdate {
    /// Range the service reports as written.
    pub updated_range: Option<String>,
    /// Number of cells the service reports as updated.
    pub updated_cells: u64,
}

/// Client for the three Sheets API calls the export needs.
///
/// # Example
///
/// ```rust,ignore
/// use forge_data::export::{SheetsClient, SheetsCredential};
/// use forge_data::{ForgeConfig, SpreadsheetId};
///
/// let credential = SheetsCredential::load("token.json".as_ref())?;
/// let client = SheetsClient::new(&ForgeConfig::default(), &credential)?;
/// let id = SpreadsheetId::new("1AbC")?;
/// if !client.tab_exists(&id, "Pool").await? {
///     client.create_tab(&id, "Pool").await?;
/// }
/// ```
#[derive(Debug)]
pub struct SheetsClient {
    http_client: HttpClient,
}

// Verify SheetsClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SheetsClient>();
};

impl SheetsClient {
    /// Creates a client authorized with `credential`'s access token.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &ForgeConfig, credential: &SheetsCredential) -> Result<Self, SheetsError> {
        let http_client =
            HttpClient::new(config.sheets_api_url(), config, Some(credential.access_token()))?;
        Ok(Self { http_client })
    }

    /// Returns `true` when the spreadsheet has a tab titled `title`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the request fails or the response has no
    /// `sheets` list.
    pub async fn tab_exists(&self, id: &SpreadsheetId, title: &str) -> Result<bool, SheetsError> {
        let request = HttpRequest::builder(HttpMethod::Get, format!("v4/spreadsheets/{id}"))
            .query_param("fields", "sheets.properties.title")
            .build()
            .map_err(HttpError::from)?;

        let response = self.http_client.request(request).await?;
        let titles = sheet_titles(&response)?;
        Ok(titles.iter().any(|existing| existing == title))
    }

    /// Adds a tab titled `title`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the batch update is rejected.
    pub async fn create_tab(&self, id: &SpreadsheetId, title: &str) -> Result<(), SheetsError> {
        let body = json!({
            "requests": [
                { "addSheet": { "properties": { "title": title } } }
            ]
        });
        let request =
            HttpRequest::builder(HttpMethod::Post, format!("v4/spreadsheets/{id}:batchUpdate"))
                .body(body)
                .build()
                .map_err(HttpError::from)?;

        self.http_client.request(request).await?;
        tracing::info!(spreadsheet = %id, tab = title, "created sheet tab");
        Ok(())
    }

    /// Writes `rows` starting at `range` (for example `Pool!A1`).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the update is rejected, or
    /// [`SheetsError::UnexpectedResponse`] if the reply has no `updatedCells`.
    pub async fn write_range(
        &self,
        id: &SpreadsheetId,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<RangeUpdate, SheetsError> {
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        let path = format!(
            "v4/spreadsheets/{id}/values/{}",
            urlencoding::encode(range)
        );
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .query_param("valueInputOption", VALUE_INPUT_OPTION)
            .body(body)
            .build()
            .map_err(HttpError::from)?;

        let response = self.http_client.request(request).await?;
        range_update(&response)
    }
}

fn range_update(response: &HttpResponse) -> Result<RangeUpdate, SheetsError> {
    let updated_cells = response
        .body
        .get("updatedCells")
        .and_then(Value::as_u64)
        .ok_or_else(|| SheetsError::UnexpectedResponse {
            detail: "missing updatedCells in values.update response".to_string(),
        })?;

    Ok(RangeUpdate {
        updated_range: response
            .body
            .get("updatedRange")
            .and_then(Value::as_str)
            .map(String::from),
        updated_cells,
    })
}

fn sheet_titles(response: &HttpResponse) -> Result<Vec<String>, SheetsError> {
    let Some(sheets) = response.body.get("sheets") else {
        // A spreadsheet whose field mask matched nothing omits the key.
        return Ok(Vec::new());
    };
    let sheets = sheets
        .as_array()
        .ok_or_else(|| SheetsError::UnexpectedResponse {
            detail: "'sheets' is not a list".to_string(),
        })?;

    Ok(sheets
        .iter()
        .filter_map(|sheet| sheet.pointer("/properties/title"))
        .filter_map(Value::as_str)
        .map(String::from)
        .collect())
}
