pub mod cli;
pub mod groups;
pub mod serde_helpers;
mod validation;

use crate::domain::Severity;
use crate::forwarding::ForwardTargets;
use serde::{Deserialize, Serialize};
use serde_helpers::{load_env_path, load_env_string_opt, load_env_var};
use std::path::Path;
use thiserror::Error;

pub use groups::{
    AppIdentity, ConsoleConfig, ConsoleFormat, FileConfig, ForwardingConfig, RotationConfig,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Everything `LogService::init` needs: identity, local sinks and optional
/// forwarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub app: AppIdentity,
    pub console: ConsoleConfig,
    pub file: FileConfig,
    pub forwarding: Option<ForwardingConfig>,
}

impl LogConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LogConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// File (when given) or defaults, then environment overrides, then
    /// validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => LogConfig::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        load_env_string_opt("RASK_LOG_APP_NAME", &mut self.app.name);

        if let Ok(level) = std::env::var("RASK_LOG_LEVEL") {
            let level: Severity = level
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid RASK_LOG_LEVEL: {e}")))?;
            self.console.level = level;
            self.file.level = level;
        }

        load_env_var("RASK_LOG_CONSOLE_ENABLED", &mut self.console.enabled)?;
        load_env_var("RASK_LOG_FILE_ENABLED", &mut self.file.enabled)?;
        load_env_path("RASK_LOG_DIR", &mut self.file.directory);

        if let Ok(endpoint) = std::env::var("RASK_LOG_FORWARD_ENDPOINT") {
            match self.forwarding.as_mut() {
                Some(forwarding) => forwarding.endpoint = endpoint,
                None => self.forwarding = Some(ForwardingConfig::new(endpoint)),
            }
        }

        if let Ok(targets) = std::env::var("RASK_LOG_FORWARD_TARGETS") {
            let targets: ForwardTargets = targets.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid RASK_LOG_FORWARD_TARGETS: {e}"))
            })?;
            match self.forwarding.as_mut() {
                Some(forwarding) => forwarding.targets = targets,
                None => {
                    return Err(ConfigError::EnvError(
                        "RASK_LOG_FORWARD_TARGETS requires a forwarding endpoint".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Application name, empty when unset.
    pub fn application_name(&self) -> &str {
        self.app.name.as_deref().unwrap_or_default()
    }
}
