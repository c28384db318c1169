use crate::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the log service to its callers.
///
/// Sink and forwarding failures never appear here; they are isolated and
/// reported through internal diagnostics.
#[derive(Error, Debug)]
pub enum LogServiceError {
    #[error("Log service is not configured: call init() before logging")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sink initialization failed for '{sink}': {source}")]
    SinkInit {
        sink: String,
        #[source]
        source: crate::sink::SinkError,
    },

    #[error("Forwarder initialization failed: {0}")]
    ForwarderInit(#[from] crate::forwarding::ForwardError),
}
