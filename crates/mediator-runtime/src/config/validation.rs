//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, MediatorConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &MediatorConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.output is 'file' but logging.file_path is not set",
        ));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "logging.filters contains an empty module name: {module:?}"
        )));
    }

    Ok(())
}
