use super::{AppMetadata, ConsoleSink, FileSink, Sink, SinkEvent};
use crate::config::LogConfig;
use crate::domain::{LogServiceError, Payload, Severity};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// The configured sinks. Fixed after construction apart from thresholds.
#[derive(Default, Clone)]
pub struct SinkRegistry {
    sinks: Vec<Arc<dyn Sink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the console and file sinks a configuration enables. Disabled
    /// sinks are not constructed at all.
    pub fn from_config(config: &LogConfig) -> Result<Self, LogServiceError> {
        let mut registry = Self::new();

        if config.console.enabled {
            registry.push(Arc::new(ConsoleSink::new(&config.console)));
        }

        if config.file.enabled {
            let metadata = AppMetadata::from_identity(&config.app);
            let sink = FileSink::new(&config.file, metadata).map_err(|source| {
                LogServiceError::SinkInit {
                    sink: "file".to_string(),
                    source,
                }
            })?;
            registry.push(Arc::new(sink));
        }

        Ok(registry)
    }

    pub fn with_sinks(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.sinks.iter().map(|sink| sink.name().to_string()).collect()
    }

    /// Write a sanitized payload to every enabled sink whose threshold admits
    /// `severity`. A failing sink is reported and skipped; the others still
    /// receive the event. Returns how many sinks accepted it.
    pub fn dispatch(&self, severity: Severity, payload: &Payload) -> usize {
        let event = SinkEvent {
            severity,
            timestamp: Utc::now(),
            payload,
        };

        let mut written = 0;
        for sink in &self.sinks {
            if !sink.admits(severity) {
                continue;
            }
            match sink.write(&event) {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!(sink = sink.name(), error = %e, "Sink write failed, event dropped for this sink");
                }
            }
        }
        written
    }

    /// Change the minimum severity of every sink.
    pub fn set_level(&self, level: Severity) {
        for sink in &self.sinks {
            sink.set_level(level);
        }
    }

    pub fn flush(&self) {
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                warn!(sink = sink.name(), error = %e, "Sink flush failed");
            }
        }
    }
}

impl std::fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("sinks", &self.names())
            .finish()
    }
}
