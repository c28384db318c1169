use crate::domain::Severity;
use crate::forwarding::ForwardTargets;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Identity attached to every file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppIdentity {
    /// Application name; required when the file sink is enabled.
    pub name: Option<String>,
    /// Overrides the detected hostname.
    pub hostname: Option<String>,
    pub version: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            name: None,
            hostname: None,
            version: "0.0.0".to_string(),
        }
    }
}

/// Line layout of the console sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// One line per event, containers as compact JSON.
    #[default]
    Simple,
    /// Padded level, containers pretty-printed over several lines.
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub level: Severity,
    pub format: ConsoleFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: Severity::Info,
            format: ConsoleFormat::Simple,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// chrono strftime pattern naming the current period, e.g. `%Y-%m-%d`.
    pub date_pattern: String,
    pub max_size_bytes: Option<u64>,
    pub compress: bool,
    /// Number of rolled files kept; `None` keeps all of them.
    pub max_files: Option<usize>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            date_pattern: "%Y-%m-%d".to_string(),
            max_size_bytes: Some(20 * 1024 * 1024), // 20MB
            compress: false,
            max_files: Some(14),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub level: Severity,
    pub directory: PathBuf,
    /// Plain append-only file when absent.
    pub rotation: Option<RotationConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: Severity::Info,
            directory: PathBuf::from("logs"),
            rotation: None,
        }
    }
}

/// Search backend settings. Absent from [`super::LogConfig`] means forwarding
/// is disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardingConfig {
    pub endpoint: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub targets: ForwardTargets,
    #[serde(default = "default_forward_timeout", with = "super::serde_helpers")]
    pub timeout: Duration,
    /// Forward the sanitized payload instead of the raw one.
    #[serde(default)]
    pub redact_forwarded: bool,
}

fn default_forward_timeout() -> Duration {
    Duration::from_secs(5)
}

impl ForwardingConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            targets: ForwardTargets::default(),
            timeout: default_forward_timeout(),
            redact_forwarded: false,
        }
    }
}
