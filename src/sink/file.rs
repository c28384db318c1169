use super::record::{AppMetadata, file_record};
use super::rotation::{RotatingWriter, RotationPolicy};
use super::{LevelGate, Sink, SinkError, SinkEvent};
use crate::config::FileConfig;
use crate::domain::Severity;
use parking_lot::Mutex;

/// Writes one sorted-key JSON record per event to a plain or rotating file.
pub struct FileSink {
    name: String,
    gate: LevelGate,
    metadata: AppMetadata,
    writer: Mutex<RotatingWriter>,
}

impl FileSink {
    pub fn new(config: &FileConfig, metadata: AppMetadata) -> Result<Self, SinkError> {
        if metadata.application.trim().is_empty() {
            return Err(SinkError::InvalidConfig(
                "file sink requires an application name".to_string(),
            ));
        }

        let policy = config.rotation.as_ref().map(RotationPolicy::from);
        let name = if policy.is_some() {
            "rotating-file"
        } else {
            "file"
        };
        let writer = RotatingWriter::new(&config.directory, metadata.application.clone(), policy)?;

        Ok(Self {
            name: name.to_string(),
            gate: LevelGate::new(config.enabled, config.level),
            metadata,
            writer: Mutex::new(writer),
        })
    }

    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self) -> bool {
        self.gate.enabled()
    }

    fn level(&self) -> Severity {
        self.gate.level()
    }

    fn set_level(&self, level: Severity) {
        self.gate.set_level(level);
    }

    fn write(&self, event: &SinkEvent<'_>) -> Result<(), SinkError> {
        let record = file_record(&self.metadata, event);
        let line = serde_json::to_string(&record)?;
        self.writer.lock().write_line(&line, event.timestamp)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("name", &self.name)
            .field("gate", &self.gate)
            .field("metadata", &self.metadata)
            .finish()
    }
}
