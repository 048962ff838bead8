//! Subgraph query executor.

use serde_json::Value;

use crate::clients::graphql::errors::GraphqlError;
use crate::clients::graphql::QueryResult;
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::ForgeConfig;
use crate::query::QueryDocument;

/// Client that sends query documents to the Forge subgraph.
///
/// Each call to [`execute`](Self::execute) is a single POST with the JSON
/// body `{"query": "<document>"}`. There is no retry.
///
/// # Thread Safety
///
/// `SubgraphClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use forge_data::clients::graphql::SubgraphClient;
/// use forge_data::query::{build, QuerySpec};
/// use forge_data::schema::EntityName;
/// use forge_data::ForgeConfig;
///
/// let client = SubgraphClient::new(&ForgeConfig::default())?;
/// let document = build(&QuerySpec::new(EntityName::Pool).field("id"))?;
/// let payload = client.execute(&document).await?;
/// println!("{}", serde_json::to_string_pretty(&payload)?);
/// ```
#[derive(Debug)]
pub struct SubgraphClient {
    http_client: HttpClient,
}

// Verify SubgraphClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SubgraphClient>();
};

impl SubgraphClient {
    /// Creates a client for the subgraph endpoint configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be created.
    pub fn new(config: &ForgeConfig) -> Result<Self, HttpError> {
        let http_client = HttpClient::new(config.subgraph_url(), config, None)?;
        Ok(Self { http_client })
    }

    /// Returns the endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.http_client.base_url()
    }

    /// Executes a query document and classifies the outcome.
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Transport`] when the request fails or the response
    ///   status is not 2xx
    /// - [`GraphqlError::Remote`] when the envelope has a non-empty `errors`
    ///   array, even if `data` is also present
    /// - [`GraphqlError::NoData`] when `data` is missing or null
    pub async fn execute(&self, document: &QueryDocument) -> QueryResult {
        tracing::info!(endpoint = %self.endpoint(), document = %document, "executing subgraph query");

        let outcome = self.send(document).await;
        match &outcome {
            Ok(payload) => {
                let collections: Vec<&str> = payload.keys().map(String::as_str).collect();
                tracing::info!(?collections, "subgraph query succeeded");
            }
            Err(error) => {
                tracing::error!(kind = %error.kind(), %error, "subgraph query failed");
            }
        }
        outcome
    }

    async fn send(&self, document: &QueryDocument) -> QueryResult {
        let body = serde_json::json!({ "query": document.as_str() });
        let request = HttpRequest::builder(HttpMethod::Post, "")
            .body(body)
            .build()
            .map_err(HttpError::from)?;

        let response = self.http_client.request(request).await?;
        classify(response.body)
    }
}

/// Classifies a response envelope.
///
/// Errors take precedence over data: any non-empty `errors` array makes the
/// whole result a [`GraphqlError::Remote`].
pub(crate) fn classify(envelope: Value) -> QueryResult {
    let Value::Object(mut envelope) = envelope else {
        return Err(GraphqlError::NoData);
    };

    if let Some(Value::Array(errors)) = envelope.get("errors") {
        if let Some(first) = errors.first() {
            return Err(GraphqlError::Remote {
                message: error_message(first),
            });
        }
    }

    match envelope.remove("data") {
        Some(Value::Object(data)) => Ok(data),
        _ => Err(GraphqlError::NoData),
    }
}

fn error_message(error: &Value) -> String {
    match error.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => error.to_string(),
    }
}
