//! Integration tests for the query transport.

use graphql_tap::{Client, ClientError, HttpMethod};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_plain_query_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": "{ x }"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"x": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(format!("{}/graphql", mock_server.uri())).unwrap();
    let data = client.query("{ x }").await.unwrap();

    assert_eq!(data, json!({"x": 1}));
}

#[tokio::test]
async fn test_variables_reach_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "query": "query($id: ID!) { user(id: $id) { name } }",
            "variables": {"id": "123"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let data = client
        .query_with_variables(
            "query($id: ID!) { user(id: $id) { name } }",
            json!({"id": "123"}),
        )
        .await
        .unwrap();

    assert_eq!(data, json!({"user": null}));
}

#[tokio::test]
async fn test_query_as_deserializes() {
    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Payload {
        x: i64,
    }

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"x": 42})))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let payload: Payload = client.query_as("{ x }").await.unwrap();

    assert_eq!(payload, Payload { x: 42 });
}

#[tokio::test]
async fn test_template_settings_reach_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .url(mock_server.uri())
        .method(HttpMethod::Put)
        .header("x-api-key", "secret")
        .build()
        .unwrap();

    client.query("{ x }").await.unwrap();
}

#[tokio::test]
async fn test_non_json_body_is_a_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let err = client.query("{ x }").await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_error_status_body_still_decodes() {
    // The pipeline imposes no status policy; a JSON body decodes whatever
    // the status code.
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"errors": ["internal"]})),
        )
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let data = client.query("{ x }").await.unwrap();

    assert_eq!(data, json!({"errors": ["internal"]}));
}

#[tokio::test]
async fn test_connection_failure_propagates() {
    // Port 1 is never listening.
    let client = Client::new("http://127.0.0.1:1/graphql").unwrap();
    let err = client.query("{ x }").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::Connection(_) | ClientError::Transport(_)
    ));
}

#[tokio::test]
async fn test_concurrent_queries_share_one_client() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let results = futures_join(&client).await;

    for data in results {
        assert_eq!(data.unwrap(), json!({"ok": true}));
    }
}

async fn futures_join(client: &Client) -> Vec<graphql_tap::Result<serde_json::Value>> {
    let (a, b, c, d) = tokio::join!(
        client.query("{ a }"),
        client.query("{ b }"),
        client.query("{ c }"),
        client.query("{ d }"),
    );
    vec![a, b, c, d]
}
