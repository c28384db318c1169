use super::{LevelGate, Sink, SinkError, SinkEvent, message_text};
use crate::config::{ConsoleConfig, ConsoleFormat};
use crate::domain::{Payload, Severity};
use chrono::SecondsFormat;
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes one formatted line per event, to stdout unless another writer is
/// injected.
pub struct ConsoleSink {
    gate: LevelGate,
    format: ConsoleFormat,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self::with_writer(config, Box::new(io::stdout()))
    }

    pub fn with_writer(config: &ConsoleConfig, writer: Box<dyn Write + Send>) -> Self {
        Self {
            gate: LevelGate::new(config.enabled, config.level),
            format: config.format,
            writer: Mutex::new(writer),
        }
    }

    pub fn format_line(&self, event: &SinkEvent<'_>) -> String {
        let timestamp = event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        match self.format {
            ConsoleFormat::Simple => format!(
                "{} {} {}",
                timestamp,
                event.severity.as_str().to_uppercase(),
                message_text(event.payload)
            ),
            ConsoleFormat::Pretty => format!(
                "{} [{:<7}] {}",
                timestamp,
                event.severity.as_str(),
                pretty_text(event.payload)
            ),
        }
    }
}

fn pretty_text(payload: &Payload) -> String {
    match payload {
        Payload::Array(_) | Payload::Object(_) => {
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
        }
        other => message_text(other),
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
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
        let line = self.format_line(event);
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("gate", &self.gate)
            .field("format", &self.format)
            .finish()
    }
}
