//! The log service: redact, dispatch to sinks, forward.

use crate::config::LogConfig;
use crate::domain::{LogServiceError, Payload, Severity};
use crate::forwarding::{ForwardStatsSnapshot, Forwarder};
use crate::redaction::{DEFAULT_MASK, Redactor};
use crate::sink::SinkRegistry;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Sinks and forwarder fixed by one `init` call.
#[derive(Debug)]
struct Configured {
    registry: SinkRegistry,
    forwarder: Option<Forwarder>,
}

impl Configured {
    fn forward(&self, severity: Severity, raw: &Payload, sanitized: &Payload, force: bool) -> bool {
        match &self.forwarder {
            Some(forwarder) => forwarder.forward(severity, raw, sanitized, force),
            None => false,
        }
    }
}

/// Leveled logging facade with built-in redaction.
///
/// The blacklist and mask live for the whole service lifetime. Sinks and
/// forwarding are installed by [`LogService::init`]; logging before that fails
/// with [`LogServiceError::NotConfigured`].
#[derive(Debug)]
pub struct LogService {
    redactor: Redactor,
    state: RwLock<Option<Arc<Configured>>>,
}

impl LogService {
    pub fn new<I, S>(blacklist: I, mask: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            redactor: Redactor::new(blacklist, mask),
            state: RwLock::new(None),
        }
    }

    /// Validate `config` and build its sinks and forwarder. Calling this again
    /// replaces both wholesale; handles returned earlier keep the old state.
    pub fn init(&self, config: &LogConfig) -> Result<(), LogServiceError> {
        config.validate()?;

        let registry = SinkRegistry::from_config(config)?;
        let forwarder = config
            .forwarding
            .as_ref()
            .map(Forwarder::new)
            .transpose()?;

        info!(
            application = config.application_name(),
            sinks = ?registry.names(),
            forwarding = forwarder.is_some(),
            "Log service initialized"
        );
        self.install(registry, forwarder);
        Ok(())
    }

    /// Install prebuilt sinks and forwarder, skipping configuration.
    pub fn init_with(&self, registry: SinkRegistry, forwarder: Option<Forwarder>) {
        self.install(registry, forwarder);
    }

    fn install(&self, registry: SinkRegistry, forwarder: Option<Forwarder>) {
        let previous = self
            .state
            .write()
            .replace(Arc::new(Configured { registry, forwarder }));
        if let Some(previous) = previous {
            previous.registry.flush();
        }
    }

    pub fn is_configured(&self) -> bool {
        self.state.read().is_some()
    }

    fn configured(&self) -> Result<Arc<Configured>, LogServiceError> {
        self.state
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(LogServiceError::NotConfigured)
    }

    pub fn debug<I, T>(&self, content: I) -> Result<LogHandle, LogServiceError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Payload>,
    {
        self.log(Severity::Debug, content)
    }

    pub fn info<I, T>(&self, content: I) -> Result<LogHandle, LogServiceError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Payload>,
    {
        self.log(Severity::Info, content)
    }

    pub fn warning<I, T>(&self, content: I) -> Result<LogHandle, LogServiceError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Payload>,
    {
        self.log(Severity::Warning, content)
    }

    pub fn error<I, T>(&self, content: I) -> Result<LogHandle, LogServiceError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Payload>,
    {
        self.log(Severity::Error, content)
    }

    /// Log every content item at `severity`.
    ///
    /// Each item is sanitized and dispatched to the sinks, then offered to the
    /// forwarder without force. The returned handle can force-forward the same
    /// items later.
    pub fn log<I, T>(&self, severity: Severity, content: I) -> Result<LogHandle, LogServiceError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Payload>,
    {
        let state = self.configured()?;

        let mut items = Vec::new();
        for raw in content.into_iter().map(Into::into) {
            let sanitized = self.redactor.sanitize(&raw);
            state.registry.dispatch(severity, &sanitized);
            state.forward(severity, &raw, &sanitized, false);
            items.push(Item { raw, sanitized });
        }

        Ok(LogHandle {
            severity,
            items,
            state,
        })
    }

    /// Change the minimum severity of every sink.
    pub fn set_level(&self, level: Severity) -> Result<(), LogServiceError> {
        let state = self.configured()?;
        state.registry.set_level(level);
        debug!(level = %level, "Sink levels changed");
        Ok(())
    }

    /// Flush buffered sink output.
    pub fn flush(&self) {
        if let Some(state) = self.state.read().as_ref() {
            state.registry.flush();
        }
    }

    /// Current blacklist, sorted.
    pub fn blacklist(&self) -> Vec<String> {
        self.redactor.blacklist().entries()
    }

    pub fn set_blacklist<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.redactor.blacklist().replace(entries);
    }

    pub fn add_to_blacklist<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.redactor.blacklist().extend(entries);
    }

    /// Remove one entry. Returns whether it was present.
    pub fn remove_from_blacklist(&self, entry: &str) -> bool {
        self.redactor.blacklist().remove(entry)
    }

    pub fn mask(&self) -> String {
        self.redactor.mask().to_string()
    }

    pub fn set_mask(&self, mask: impl Into<String>) {
        self.redactor.set_mask(mask);
    }

    /// Forwarder counters, `None` when forwarding is not configured.
    pub fn forward_stats(&self) -> Option<ForwardStatsSnapshot> {
        self.state
            .read()
            .as_ref()
            .and_then(|state| state.forwarder.as_ref().map(Forwarder::stats))
    }
}

impl Default for LogService {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), DEFAULT_MASK)
    }
}

#[derive(Debug, Clone)]
struct Item {
    raw: Payload,
    sanitized: Payload,
}

/// The result of one logging call, bound to the state that was configured
/// when the call was made.
#[derive(Debug)]
pub struct LogHandle {
    severity: Severity,
    items: Vec<Item>,
    state: Arc<Configured>,
}

impl LogHandle {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Raw content of this call, as given by the caller.
    pub fn content(&self) -> impl Iterator<Item = &Payload> {
        self.items.iter().map(|item| &item.raw)
    }

    /// Forward every item regardless of the configured targets. Returns the
    /// number of records queued; zero when forwarding is not configured.
    pub fn send(&self) -> usize {
        self.items
            .iter()
            .filter(|item| {
                self.state
                    .forward(self.severity, &item.raw, &item.sanitized, true)
            })
            .count()
    }
}
