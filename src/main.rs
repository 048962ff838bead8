use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use forge_data::export::sheets::refresh_credential;
use forge_data::export::{
    CredentialError, DelimitedSink, ExportSource, ExportTarget, RemoteSheetSink,
    SheetsCredential, SheetsError, SpreadsheetSink, StructuredSink,
};
use forge_data::normalize::TableRows;
use forge_data::query::{FilterAddress, QuerySpec, SavedQuery, SavedQueryError, DEFAULT_LIMIT};
use forge_data::schema::{self, EntityName};
use forge_data::{EndpointUrl, ForgeConfig, ForgeError, QueryEngine, SpreadsheetId};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "forge_data=info";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.log_file.as_deref()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }

    if let Err(error) = run(cli).await {
        tracing::error!(%error, "command failed");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<(), CliError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| CliError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Entities { entity } => {
            print_entities(entity.as_deref())?;
            Ok(())
        }
        Command::Query(args) => {
            let config = build_config(&cli.endpoint, &cli.sheets_api, cli.timeout)?;
            execute_query(config, args).await
        }
    }
}

fn print_entities(entity: Option<&str>) -> Result<(), CliError> {
    let Some(name) = entity else {
        print!("{}", schema::help_text());
        return Ok(());
    };

    let descriptor = schema::lookup(name).map_err(ForgeError::from)?;
    println!("{}: {}", descriptor.name, descriptor.description);
    println!("Filter: {}", descriptor.name.address_hint());
    for field in descriptor.fields {
        println!("  {:<22} {}", field.name, field.description);
    }
    Ok(())
}

fn build_config(
    endpoint: &str,
    sheets_api: &str,
    timeout: Option<u64>,
) -> Result<ForgeConfig, CliError> {
    let mut builder = ForgeConfig::builder()
        .subgraph_url(EndpointUrl::new(endpoint).map_err(ForgeError::from)?)
        .sheets_api_url(EndpointUrl::new(sheets_api).map_err(ForgeError::from)?);
    if let Some(seconds) = timeout {
        builder = builder.request_timeout(Duration::from_secs(seconds));
    }
    Ok(builder.build().map_err(ForgeError::from)?)
}

async fn execute_query(config: ForgeConfig, args: QueryArgs) -> Result<(), CliError> {
    let spec = args.resolve_spec()?;

    if let Some(path) = &args.save {
        SavedQuery::from_spec(&spec).save(path)?;
    }

    let sheet_sink = match &args.sheet {
        Some(id) => Some(sheet_sink(&config, &args.token, id).await?),
        None => None,
    };

    let engine = QueryEngine::new(config)?;
    let payload = engine.build_and_run(&spec).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    let mut targets = Vec::new();
    if let Some(path) = &args.csv {
        targets.push(ExportTarget::Delimited(DelimitedSink::new(path)));
    }
    if let Some(path) = &args.xlsx {
        targets.push(ExportTarget::Spreadsheet(SpreadsheetSink::new(path)));
    }
    if let Some(path) = &args.json {
        targets.push(ExportTarget::Structured(StructuredSink::new(path)));
    }
    if let Some(sink) = sheet_sink {
        targets.push(ExportTarget::RemoteSheet(sink));
    }

    let needs_rows = targets
        .iter()
        .any(|target| !matches!(target, ExportTarget::Structured(_)));
    let rows = if needs_rows {
        engine
            .normalize(spec.entity, &payload)
            .map_err(ForgeError::from)?
    } else {
        TableRows::default()
    };

    let source = ExportSource::new(spec.entity, &payload, &rows);
    for target in &targets {
        let outcome = engine.export(target, &source).await.map_err(ForgeError::from)?;
        eprintln!("{outcome}");
    }
    Ok(())
}

async fn sheet_sink(
    config: &ForgeConfig,
    token_path: &Path,
    spreadsheet_id: &str,
) -> Result<RemoteSheetSink, CliError> {
    let spreadsheet_id = SpreadsheetId::new(spreadsheet_id).map_err(ForgeError::from)?;
    let credential = SheetsCredential::load(token_path)?;
    let credential = ensure_fresh(config, credential, token_path).await?;
    Ok(RemoteSheetSink::new(config, &credential, spreadsheet_id)?)
}

/// Refreshes an expired credential and writes it back to the token file.
async fn ensure_fresh(
    config: &ForgeConfig,
    credential: SheetsCredential,
    token_path: &Path,
) -> Result<SheetsCredential, CliError> {
    if credential.is_valid() {
        return Ok(credential);
    }
    if !credential.can_refresh() {
        return Err(CredentialError::MissingRefreshToken.into());
    }

    let refreshed = refresh_credential(config, &credential).await?;
    refreshed.save(token_path)?;
    tracing::info!(path = %token_path.display(), "token file updated");
    Ok(refreshed)
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Forge(#[from] ForgeError),

    #[error(transparent)]
    SavedQuery(#[from] SavedQueryError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Sheets(#[from] SheetsError),

    #[error("Failed to render payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to open log file '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("--entity is required unless --load is given")]
    MissingEntity,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Query the Forge DEX subgraph and export the results."
)]
struct Cli {
    /// GraphQL endpoint of the Forge subgraph.
    #[arg(
        long,
        global = true,
        env = "FORGE_SUBGRAPH_URL",
        default_value = forge_data::config::DEFAULT_SUBGRAPH_URL
    )]
    endpoint: String,

    /// Base URL of the Google Sheets API.
    #[arg(
        long,
        global = true,
        env = "FORGE_SHEETS_API",
        default_value = forge_data::config::DEFAULT_SHEETS_API_URL
    )]
    sheets_api: String,

    /// Request timeout in seconds. No timeout when omitted.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe the queryable entities and their fields.
    Entities {
        /// Only describe this entity.
        entity: Option<String>,
    },
    /// Run a query and optionally export the results.
    Query(QueryArgs),
}

#[derive(clap::Args)]
struct QueryArgs {
    /// Entity to query (e.g. Pool, Swap, WalletOverview).
    #[arg(long, conflicts_with = "load")]
    entity: Option<EntityName>,

    /// Field to select; repeat for several fields.
    #[arg(long = "field", conflicts_with = "load")]
    fields: Vec<String>,

    /// Select every field of the entity.
    #[arg(long, conflicts_with_all = ["fields", "load"])]
    all_fields: bool,

    /// Pool, token or wallet address to filter on.
    #[arg(long, conflicts_with = "load")]
    address: Option<String>,

    /// Maximum number of records to fetch.
    #[arg(long, default_value_t = DEFAULT_LIMIT, conflicts_with = "load")]
    limit: u32,

    /// Load the query configuration from a JSON file.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Save the query configuration to a JSON file.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Export the rows as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Export the rows as an XLSX workbook.
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Export the raw payload as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Export the rows to this Google spreadsheet id.
    #[arg(long)]
    sheet: Option<String>,

    /// Authorized-user token file for Google Sheets.
    #[arg(long, default_value = "token.json")]
    token: PathBuf,
}

impl QueryArgs {
    fn resolve_spec(&self) -> Result<QuerySpec, CliError> {
        if let Some(path) = &self.load {
            let saved = SavedQuery::load(path)?;
            return Ok(saved.to_spec().map_err(ForgeError::from)?);
        }

        let entity = self.entity.ok_or(CliError::MissingEntity)?;
        let spec = if self.all_fields {
            QuerySpec::all_fields(entity)
        } else {
            QuerySpec::new(entity).fields(&self.fields)
        };
        let mut spec = spec.limit(self.limit);
        spec.address = FilterAddress::parse_optional(self.address.as_deref().unwrap_or(""))
            .map_err(ForgeError::from)?;
        Ok(spec)
    }
}
