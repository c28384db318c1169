use rask_logger::config::LogConfig;
use rask_logger::domain::ABSENT_PLACEHOLDER;
use rask_logger::{LogService, LogServiceError, Severity};
use serde_json::{Value, json};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> LogConfig {
    let mut config = LogConfig::default();
    config.app.name = Some("payments".to_string());
    config.console.enabled = false;
    config.file.enabled = true;
    config.file.level = Severity::Debug;
    config.file.directory = dir.path().to_path_buf();
    config
}

fn messages(dir: &TempDir) -> Vec<Value> {
    std::fs::read_to_string(dir.path().join("payments.log"))
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .collect()
}

#[test]
fn test_logging_before_init_fails() {
    let service = LogService::new(["password"], "*");
    assert!(matches!(
        service.error(["too early"]),
        Err(LogServiceError::NotConfigured)
    ));
}

#[test]
fn test_file_sink_receives_sanitized_content() {
    let dir = TempDir::new().unwrap();
    let service = LogService::new(["password"], "*");
    service.init(&file_config(&dir)).unwrap();

    service
        .info([json!({"message": "login", "user": "a", "password": "secret"})])
        .unwrap();

    let records = messages(&dir);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user"], "a");
    assert_eq!(records[0]["password"], "*");
    assert_eq!(records[0]["message"], "login");
}

#[test]
fn test_multiple_items_each_written() {
    let dir = TempDir::new().unwrap();
    let service = LogService::default();
    service.init(&file_config(&dir)).unwrap();

    let handle = service.warning(vec![json!("one"), json!(2), json!(null)]).unwrap();
    assert_eq!(handle.len(), 3);

    let texts: Vec<Value> = messages(&dir).into_iter().map(|r| r["message"].clone()).collect();
    // Null is absent content, rendered like the forwarded placeholder
    assert_eq!(texts, vec![json!("one"), json!("2"), json!(ABSENT_PLACEHOLDER)]);
}

#[test]
fn test_set_level_raises_threshold() {
    let dir = TempDir::new().unwrap();
    let service = LogService::default();
    service.init(&file_config(&dir)).unwrap();

    service.set_level(Severity::Error).unwrap();
    service.debug(["hidden"]).unwrap();
    service.warning(["hidden"]).unwrap();
    service.error(["shown"]).unwrap();

    let records = messages(&dir);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "error");
}

#[test]
fn test_blacklist_changes_apply_to_next_call() {
    let dir = TempDir::new().unwrap();
    let service = LogService::new(Vec::<String>::new(), "[REDACTED]");
    service.init(&file_config(&dir)).unwrap();

    service.info([json!({"ssn": "123"})]).unwrap();
    service.add_to_blacklist(["ssn"]);
    service.info([json!({"ssn": "456"})]).unwrap();

    let records = messages(&dir);
    assert_eq!(records[0]["ssn"], "123");
    assert_eq!(records[1]["ssn"], "[REDACTED]");
}

#[test]
fn test_init_requires_application_for_file_sink() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir);
    config.app.name = None;

    let service = LogService::default();
    assert!(matches!(
        service.init(&config),
        Err(LogServiceError::Config(_))
    ));
}
