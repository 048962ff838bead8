//! Integration tests for subgraph query execution.
//!
//! A wiremock server stands in for the subgraph endpoint.

use forge_data::clients::graphql::{FailureKind, GraphqlError, SubgraphClient};
use forge_data::clients::HttpError;
use forge_data::query::{build, QuerySpec};
use forge_data::schema::EntityName;
use forge_data::{EndpointUrl, ForgeConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SubgraphClient {
    let config = ForgeConfig::builder()
        .subgraph_url(EndpointUrl::new(format!("{}/subgraphs/name/forge", server.uri())).unwrap())
        .build()
        .unwrap();
    SubgraphClient::new(&config).unwrap()
}

fn swap_document() -> forge_data::query::QueryDocument {
    build(&QuerySpec::new(EntityName::Swap).fields(["id", "amountUSD"]).limit(2)).unwrap()
}

#[tokio::test]
async fn test_execute_posts_document_and_returns_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/subgraphs/name/forge"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "query": "query { swaps(first: 2) { id amountUSD } }"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "swaps": [
                    { "id": "0x1", "amountUSD": "5.0" },
                    { "id": "0x2", "amountUSD": "7.5" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client_for(&server).execute(&swap_document()).await.unwrap();

    let swaps = payload["swaps"].as_array().unwrap();
    assert_eq!(swaps.len(), 2);
    assert_eq!(swaps[1]["amountUSD"], "7.5");
}

#[tokio::test]
async fn test_errors_take_precedence_over_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "swaps": [{ "id": "0x1" }] },
            "errors": [
                { "message": "indexing_error" },
                { "message": "second error" }
            ]
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .execute(&swap_document())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), FailureKind::RemoteError);
    assert!(matches!(error, GraphqlError::Remote { ref message } if message == "indexing_error"));
}

#[tokio::test]
async fn test_missing_data_is_no_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .execute(&swap_document())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), FailureKind::NoData);
    assert_eq!(error.to_string(), "query returned no matching data");
}

#[tokio::test]
async fn test_null_data_is_no_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .execute(&swap_document())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), FailureKind::NoData);
}

#[tokio::test]
async fn test_server_error_is_transport_failure_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .execute(&swap_document())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), FailureKind::Transport);
    match error {
        GraphqlError::Transport(HttpError::Response(response)) => {
            assert_eq!(response.code, 500);
            assert!(response.message.contains("upstream exploded"));
        }
        other => panic!("expected an HTTP response error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_failure() {
    let config = ForgeConfig::builder()
        .subgraph_url(EndpointUrl::new("http://127.0.0.1:1/subgraphs/name/forge").unwrap())
        .build()
        .unwrap();
    let client = SubgraphClient::new(&config).unwrap();

    let error = client.execute(&swap_document()).await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::Transport);
    assert!(matches!(error, GraphqlError::Transport(HttpError::Network(_))));
}
