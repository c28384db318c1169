use super::{SinkEvent, message_text};
use crate::config::AppIdentity;
use chrono::SecondsFormat;
use serde_json::{Map, Value};

/// Constant metadata attached to every file record, captured once at init.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMetadata {
    pub application: String,
    pub hostname: String,
    pub version: String,
    pub pid: u32,
}

impl AppMetadata {
    pub fn from_identity(identity: &AppIdentity) -> Self {
        let hostname = identity.hostname.clone().unwrap_or_else(detect_hostname);
        Self {
            application: identity.name.clone().unwrap_or_default(),
            hostname,
            version: identity.version.clone(),
            pid: std::process::id(),
        }
    }
}

fn detect_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Build the structured record written to file sinks.
///
/// Keys come out sorted. A mapping payload contributes its own fields, with
/// its `message` field (if any) becoming the record message; metadata keys
/// win over payload fields of the same name. Any other payload is the
/// message itself.
pub fn file_record(metadata: &AppMetadata, event: &SinkEvent<'_>) -> Map<String, Value> {
    let mut record = Map::new();

    match event.payload {
        Value::Object(fields) => {
            for (key, value) in fields {
                if key == "message" {
                    record.insert(key.clone(), Value::String(message_text(value)));
                } else {
                    record.insert(key.clone(), value.clone());
                }
            }
        }
        other => {
            record.insert("message".to_string(), Value::String(message_text(other)));
        }
    }

    record.insert(
        "timestamp".to_string(),
        Value::String(event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    record.insert("pid".to_string(), Value::from(metadata.pid));
    record.insert("hostname".to_string(), Value::String(metadata.hostname.clone()));
    record.insert(
        "application".to_string(),
        Value::String(metadata.application.clone()),
    );
    record.insert("version".to_string(), Value::String(metadata.version.clone()));
    record.insert(
        "level".to_string(),
        Value::String(event.severity.as_str().to_string()),
    );

    record
}
