use rask_logger::config::{ForwardingConfig, LogConfig};
use rask_logger::forwarding::ForwardTargets;
use rask_logger::{LogService, Severity};
use serde_json::json;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(forwarding: Option<ForwardingConfig>) -> LogConfig {
    let mut config = LogConfig::default();
    config.console.enabled = false;
    config.forwarding = forwarding;
    config
}

async fn wait_delivered(service: &LogService, expected: u64) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(stats) = service.forward_stats()
            && stats.delivered + stats.failed >= expected
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_forwarding_config_means_no_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = LogService::default();
    service.init(&config(None)).unwrap();

    let handle = service.error(["boom"]).unwrap();
    assert_eq!(handle.send(), 0);
    assert!(service.forward_stats().is_none());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_send_overrides_targets() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/info-log/_doc"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let forwarding = ForwardingConfig {
        targets: ForwardTargets::Severities(BTreeSet::from([Severity::Error])),
        ..ForwardingConfig::new(mock_server.uri())
    };
    let service = LogService::new(["password"], "*");
    service.init(&config(Some(forwarding))).unwrap();

    let handle = service.info([json!({"password": "raw"})]).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(mock_server.received_requests().await.unwrap().is_empty());

    assert_eq!(handle.send(), 1);
    wait_delivered(&service, 1).await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    // Forwarded content is the raw value, not the sanitized one
    assert_eq!(body, json!({"index": "info-log", "message": "{\"password\":\"raw\"}"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wildcard_forwards_every_item() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(3)
        .mount(&mock_server)
        .await;

    let forwarding = ForwardingConfig {
        targets: "all".parse().unwrap(),
        ..ForwardingConfig::new(mock_server.uri())
    };
    let service = LogService::default();
    service.init(&config(Some(forwarding))).unwrap();

    service.debug(["a", "b"]).unwrap();
    service.warning(["c"]).unwrap();
    wait_delivered(&service, 3).await;

    let stats = service.forward_stats().unwrap();
    assert_eq!(stats.delivered, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_targets_forward_only_on_send() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/error-log/_doc"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let forwarding = ForwardingConfig {
        targets: ForwardTargets::Severities(BTreeSet::new()),
        ..ForwardingConfig::new(mock_server.uri())
    };
    let service = LogService::default();
    service.init(&config(Some(forwarding))).unwrap();

    let handle = service.error(["outage"]).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(mock_server.received_requests().await.unwrap().is_empty());
    assert_eq!(service.forward_stats().unwrap().queued, 0);

    assert_eq!(handle.send(), 1);
    wait_delivered(&service, 1).await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"index": "error-log", "message": "outage"}));
}
