use crate::domain::Severity;
use crate::redaction::DEFAULT_MASK;
use clap::Parser;
use std::path::PathBuf;

/// Log every line read from stdin through a redacting rask-logger service.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML configuration file (defaults plus environment when omitted)
    #[arg(long, env = "RASK_LOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Comma-separated field names to mask
    #[arg(long, env = "RASK_LOG_BLACKLIST", value_delimiter = ',')]
    pub blacklist: Vec<String>,

    /// Replacement for masked values
    #[arg(long, env = "RASK_LOG_MASK", default_value = DEFAULT_MASK)]
    pub mask: String,

    /// Severity each input line is logged at
    #[arg(long, default_value = "info")]
    pub level: Severity,

    /// Forward every line regardless of configured targets
    #[arg(long)]
    pub force: bool,

    /// Filter for the logger's own diagnostics (tracing directive syntax)
    #[arg(long, env = "RASK_LOG_DIAGNOSTICS", default_value = "warn")]
    pub diagnostics: String,
}
