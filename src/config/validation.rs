use super::{ConfigError, LogConfig, RotationConfig};
use chrono::format::{Item, StrftimeItems};
use url::Url;

impl LogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file.enabled {
            // File records carry the application name
            if self.application_name().trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "Application name is required when the file sink is enabled".to_string(),
                ));
            }

            if self.file.directory.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "File sink directory must not be empty".to_string(),
                ));
            }

            if let Some(rotation) = &self.file.rotation {
                validate_rotation(rotation)?;
            }
        }

        if let Some(forwarding) = &self.forwarding {
            let url = Url::parse(&forwarding.endpoint).map_err(|e| {
                ConfigError::InvalidUrl(format!(
                    "Invalid forwarding endpoint '{}': {}",
                    forwarding.endpoint, e
                ))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(format!(
                    "Forwarding endpoint must use http or https, got '{}'",
                    url.scheme()
                )));
            }

            if forwarding.timeout.is_zero() {
                return Err(ConfigError::InvalidConfig(
                    "Forwarding timeout must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn validate_rotation(rotation: &RotationConfig) -> Result<(), ConfigError> {
    if rotation.date_pattern.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "Rotation date pattern must not be empty".to_string(),
        ));
    }

    if rotation.date_pattern.contains(['/', '\\']) {
        return Err(ConfigError::InvalidConfig(format!(
            "Rotation date pattern '{}' must not contain path separators",
            rotation.date_pattern
        )));
    }

    if StrftimeItems::new(&rotation.date_pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidConfig(format!(
            "Invalid rotation date pattern '{}'",
            rotation.date_pattern
        )));
    }

    if rotation.max_size_bytes == Some(0) {
        return Err(ConfigError::InvalidConfig(
            "Rotation max size must be greater than 0".to_string(),
        ));
    }

    if rotation.max_files == Some(0) {
        return Err(ConfigError::InvalidConfig(
            "Rotation max files must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
