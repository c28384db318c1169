use rask_logger::Severity;
use rask_logger::config::ForwardingConfig;
use rask_logger::forwarding::{BackendClient, ForwardError, ForwardRecord, SearchClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_posts_record_to_index_doc() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/error-log/_doc"))
        .and(body_json(json!({"index": "error-log", "message": "{\"code\":500}"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SearchClient::new(&ForwardingConfig::new(mock_server.uri())).unwrap();
    let record = ForwardRecord::new(Severity::Error, &json!({"code": 500}));
    assert!(client.index(record).await.is_ok());
}

#[tokio::test]
async fn test_sends_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info-log/_doc"))
        .and(basic_auth("elastic", "changeme"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ForwardingConfig {
        username: Some("elastic".to_string()),
        password: Some("changeme".to_string()),
        ..ForwardingConfig::new(mock_server.uri())
    };
    let client = SearchClient::new(&config).unwrap();
    let record = ForwardRecord::new(Severity::Info, &json!("hello"));
    assert!(client.index(record).await.is_ok());
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("shard failure"))
        .mount(&mock_server)
        .await;

    let client = SearchClient::new(&ForwardingConfig::new(mock_server.uri())).unwrap();
    let result = client
        .index(ForwardRecord::new(Severity::Warning, &json!(null)))
        .await;

    match result {
        Err(ForwardError::HttpError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "shard failure");
        }
        other => panic!("Expected HttpError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let config = ForwardingConfig {
        timeout: Duration::from_millis(100),
        ..ForwardingConfig::new(mock_server.uri())
    };
    let client = SearchClient::new(&config).unwrap();
    let result = client
        .index(ForwardRecord::new(Severity::Error, &json!("slow")))
        .await;
    assert!(matches!(result, Err(ForwardError::RequestError(_))));
}

#[test]
fn test_rejects_bad_endpoint() {
    let result = SearchClient::new(&ForwardingConfig::new("not a url"));
    assert!(matches!(result, Err(ForwardError::InvalidConfiguration(_))));
}
