//! Local log destinations and the registry that fans events out to them.
//!
//! A null content item is absent content: sinks render it as
//! [`ABSENT_PLACEHOLDER`], the same text forwarded records carry.

pub mod console;
pub mod file;
pub mod record;
pub mod registry;
pub mod rotation;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use record::{AppMetadata, file_record};
pub use registry::SinkRegistry;
pub use rotation::{RotatingWriter, RotationPolicy};

use crate::domain::{ABSENT_PLACEHOLDER, Payload, Severity};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid sink configuration: {0}")]
    InvalidConfig(String),
}

/// One sanitized event as handed to a sink.
#[derive(Debug, Clone, Copy)]
pub struct SinkEvent<'a> {
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub payload: &'a Payload,
}

/// A single output destination.
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    /// Minimum severity this sink emits.
    fn level(&self) -> Severity;

    fn set_level(&self, level: Severity);

    /// Write one event. Threshold and enablement are checked by the registry.
    fn write(&self, event: &SinkEvent<'_>) -> Result<(), SinkError>;

    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    fn admits(&self, severity: Severity) -> bool {
        self.enabled() && severity.admits(self.level())
    }
}

/// Enablement flag plus a runtime-adjustable threshold.
#[derive(Debug)]
pub struct LevelGate {
    enabled: bool,
    level: AtomicU8,
}

impl LevelGate {
    pub fn new(enabled: bool, level: Severity) -> Self {
        Self {
            enabled,
            level: AtomicU8::new(level.to_u8()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn level(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.to_u8(), Ordering::Relaxed);
    }
}

/// Text of a payload as a single message: strings verbatim, null as the
/// absent placeholder, everything else as compact JSON.
pub(crate) fn message_text(payload: &Payload) -> String {
    match payload {
        Payload::String(s) => s.clone(),
        Payload::Null => ABSENT_PLACEHOLDER.to_string(),
        other => other.to_string(),
    }
}
