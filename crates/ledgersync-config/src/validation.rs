// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive batch sizes and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::LedgersyncConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &LedgersyncConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    for (key, url) in [
        ("engine.base_url", &config.engine.base_url),
        ("relay.base_url", &config.relay.base_url),
    ] {
        let url = url.trim();
        if url.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be an http(s) URL, got `{url}`"),
            });
        }
    }

    if config.sync.batch_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.batch_limit must be positive".to_string(),
        });
    }

    if config.sync.fan_out_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.fan_out_limit must be positive".to_string(),
        });
    }

    if config.sync.schedule_interval_seconds == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.schedule_interval_seconds must be positive".to_string(),
        });
    }

    if config.sync.poll_interval_seconds == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.poll_interval_seconds must be positive".to_string(),
        });
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of {valid_levels:?}, got `{}`",
                config.service.log_level
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LedgersyncConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_batch_limit_is_rejected() {
        let mut config = LedgersyncConfig::default();
        config.sync.batch_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("batch_limit"))
        );
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = LedgersyncConfig::default();
        config.sync.batch_limit = 0;
        config.sync.fan_out_limit = 0;
        config.storage.database_path = "".to_string();
        config.engine.base_url = "ftp://nope".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "validation should not fail fast");
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = LedgersyncConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }
}
