use rask_logger::Severity;
use rask_logger::config::ForwardingConfig;
use rask_logger::forwarding::{ForwardStatsSnapshot, ForwardTargets, Forwarder, should_forward};
use serde_json::json;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn settled(forwarder: &Forwarder, expected: u64) -> ForwardStatsSnapshot {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let stats = forwarder.stats();
        let done = stats.delivered + stats.failed;
        if done >= expected || Instant::now() >= deadline {
            return stats;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[test]
fn test_policy_table() {
    let errors = ForwardTargets::Severities(BTreeSet::from([Severity::Error]));

    assert!(!should_forward(Severity::Error, None, true));
    assert!(!should_forward(Severity::Info, Some(&errors), false));
    assert!(should_forward(Severity::Info, Some(&errors), true));
    assert!(should_forward(Severity::Error, Some(&errors), false));
    assert!(should_forward(Severity::Debug, Some(&ForwardTargets::All), false));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forwards_to_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/error-log/_doc"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&mock_server)
        .await;

    let forwarder = Forwarder::new(&ForwardingConfig::new(mock_server.uri())).unwrap();
    let payload = json!({"password": "raw"});

    assert!(forwarder.forward(Severity::Error, &payload, &payload, false));
    assert!(forwarder.forward(Severity::Error, &json!("second"), &json!("second"), false));
    assert!(!forwarder.forward(Severity::Info, &payload, &payload, false));

    let stats = settled(&forwarder, 2).await;
    assert_eq!(stats.queued, 2);
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.failed, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_backend_failures_are_counted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = ForwardingConfig {
        targets: ForwardTargets::All,
        ..ForwardingConfig::new(mock_server.uri())
    };
    let forwarder = Forwarder::new(&config).unwrap();
    forwarder.forward(Severity::Debug, &json!(1), &json!(1), false);

    let stats = settled(&forwarder, 1).await;
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.pending(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redact_forwarded_sends_sanitized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = ForwardingConfig {
        redact_forwarded: true,
        ..ForwardingConfig::new(mock_server.uri())
    };
    let forwarder = Forwarder::new(&config).unwrap();
    assert!(forwarder.redacts_forwarded());
    forwarder.forward(
        Severity::Error,
        &json!({"password": "raw"}),
        &json!({"password": "*"}),
        false,
    );
    settled(&forwarder, 1).await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["message"], "{\"password\":\"*\"}");
}
