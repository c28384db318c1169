use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("Invalid filter directive '{directive}': {source}")]
    InvalidDirective {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to install tracing subscriber: {0}")]
    InitFailed(String),
}

/// Filter directives for the crate's own diagnostics output.
///
/// Diagnostics go to stderr so they never interleave with console sink output
/// on stdout.
pub struct DiagnosticsSystem {
    directives: Arc<RwLock<Vec<Directive>>>,
}

impl DiagnosticsSystem {
    pub fn new() -> Self {
        Self {
            directives: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn add_directive(&self, directive: &str) -> Result<(), DiagnosticsError> {
        let parsed = directive
            .trim()
            .parse::<Directive>()
            .map_err(|source| DiagnosticsError::InvalidDirective {
                directive: directive.to_string(),
                source,
            })?;
        self.directives.write().push(parsed);
        Ok(())
    }

    /// Quiet the HTTP stack used by the forwarder.
    pub fn add_default_directives(&self) -> Result<(), DiagnosticsError> {
        for directive in ["hyper=warn", "reqwest=warn", "h2=warn", "rustls=warn"] {
            self.add_directive(directive)?;
        }
        Ok(())
    }

    /// `default` first, then every added directive, comma separated.
    pub fn build_filter_string(&self, default: &str) -> String {
        let directives = self.directives.read();
        let mut parts = Vec::with_capacity(directives.len() + 1);
        parts.push(default.to_string());
        parts.extend(directives.iter().map(ToString::to_string));
        parts.join(",")
    }

    pub fn directive_count(&self) -> usize {
        self.directives.read().len()
    }

    pub fn initialize_tracing(&self, default: &str) -> Result<(), DiagnosticsError> {
        let filter_string = self.build_filter_string(default);
        let env_filter = EnvFilter::try_new(&filter_string).map_err(|e| {
            DiagnosticsError::InitFailed(format!("Bad filter '{filter_string}': {e}"))
        })?;

        let subscriber = tracing_subscriber::registry().with(env_filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .compact(),
        );

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| DiagnosticsError::InitFailed(e.to_string()))
    }
}

impl Default for DiagnosticsSystem {
    fn default() -> Self {
        Self::new()
    }
}
