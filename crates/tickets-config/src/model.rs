// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketsConfig {
    /// Process-level settings.
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// Stale sweep settings.
    #[serde(default)]
    pub stale: StaleConfig,

    /// Stale record persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Stale sweep configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StaleConfig {
    /// Run the background sweep at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between sweeps. Also the resolution at which staleness is detected
    /// and the width of the closing-soon window.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// How many recent messages the ping policy inspects.
    #[serde(default = "default_message_window")]
    pub message_window: usize,

    /// Upper bound, in seconds, on each collaborator call made while evaluating a ticket.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Maximum number of tickets evaluated concurrently within one sweep.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Messages after which a stale ticket is considered active again.
    /// `None` keeps counting without ever reactivating.
    #[serde(default)]
    pub reactivate_after_messages: Option<u32>,
}

impl StaleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for StaleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            message_window: default_message_window(),
            call_timeout_secs: default_call_timeout_secs(),
            max_concurrency: default_max_concurrency(),
            reactivate_after_messages: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    15 * 60
}

fn default_message_window() -> usize {
    5
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    16
}

/// Stale record persistence configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Persist stale records in SQLite so they survive restarts.
    /// When false, records live only in process memory.
    #[serde(default = "default_true")]
    pub persist_stale: bool,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist_stale: true,
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tickets").join("tickets.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tickets.db"))
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TicketsConfig::default();
        assert_eq!(config.daemon.log_level, "info");
        assert!(config.stale.enabled);
        assert_eq!(config.stale.interval_secs, 900);
        assert_eq!(config.stale.interval(), Duration::from_secs(900));
        assert_eq!(config.stale.message_window, 5);
        assert_eq!(config.stale.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.stale.max_concurrency, 16);
        assert!(config.stale.reactivate_after_messages.is_none());
        assert!(config.storage.persist_stale);
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("tickets.db"));
    }

    #[test]
    fn partial_stale_section_keeps_other_defaults() {
        let config: TicketsConfig = toml::from_str(
            r#"
[stale]
interval_secs = 60
reactivate_after_messages = 5
"#,
        )
        .unwrap();
        assert_eq!(config.stale.interval_secs, 60);
        assert_eq!(config.stale.reactivate_after_messages, Some(5));
        assert_eq!(config.stale.message_window, 5);
        assert!(config.storage.persist_stale);
    }

    #[test]
    fn stale_deny_unknown_fields() {
        let result = toml::from_str::<TicketsConfig>(
            r#"
[stale]
interval = 60
"#,
        );
        assert!(result.is_err());
    }
}
