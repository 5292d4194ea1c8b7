// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-zero intervals and bounded message windows.

use crate::diagnostic::ConfigError;
use crate::model::TicketsConfig;

/// Largest message window the ping policy may request.
pub const MAX_MESSAGE_WINDOW: usize = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TicketsConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.stale.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "stale.interval_secs must be greater than 0".to_string(),
        });
    }

    if config.stale.message_window == 0 || config.stale.message_window > MAX_MESSAGE_WINDOW {
        errors.push(ConfigError::Validation {
            message: format!(
                "stale.message_window must be between 1 and {MAX_MESSAGE_WINDOW}, got {}",
                config.stale.message_window
            ),
        });
    }

    if config.stale.call_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "stale.call_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.stale.max_concurrency == 0 {
        errors.push(ConfigError::Validation {
            message: "stale.max_concurrency must be at least 1".to_string(),
        });
    }

    if config.stale.reactivate_after_messages == Some(0) {
        errors.push(ConfigError::Validation {
            message: "stale.reactivate_after_messages must be at least 1 when set".to_string(),
        });
    }

    if config.storage.persist_stale && config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty when storage.persist_stale is enabled"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = TicketsConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let mut config = TicketsConfig::default();
        config.stale.interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "interval_secs"));
    }

    #[test]
    fn oversized_message_window_fails_validation() {
        let mut config = TicketsConfig::default();
        config.stale.message_window = 500;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "message_window"));
    }

    #[test]
    fn empty_database_path_only_matters_when_persisting() {
        let mut config = TicketsConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));

        config.storage.persist_stale = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = TicketsConfig::default();
        config.stale.interval_secs = 0;
        config.stale.call_timeout_secs = 0;
        config.stale.max_concurrency = 0;
        config.stale.reactivate_after_messages = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
