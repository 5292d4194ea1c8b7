// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tickets.toml` > `~/.config/tickets/tickets.toml` > `/etc/tickets/tickets.toml`
//! with environment variable overrides via `TICKETS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::TicketsConfig;

/// Top-level sections that environment variables can address.
const ENV_SECTIONS: &[&str] = &["daemon", "stale", "storage"];

/// Path of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tickets/tickets.toml";

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tickets.toml";

/// Path of the per-user config file, if a config directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tickets").join("tickets.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tickets/tickets.toml` (system-wide)
/// 3. `~/.config/tickets/tickets.toml` (user XDG config)
/// 4. `./tickets.toml` (local directory)
/// 5. `TICKETS_*` environment variables
pub fn load_config() -> Result<TicketsConfig, figment::Error> {
    let figment = build_figment();
    for metadata in figment.metadata() {
        if let Some(source) = &metadata.source {
            debug!(provider = %metadata.name, source = %source, "config source merged");
        }
    }
    figment.extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TicketsConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketsConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TicketsConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketsConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TicketsConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Maps only the leading section name to a dot so that underscores inside key
/// names survive: `TICKETS_STALE_INTERVAL_SECS` becomes `stale.interval_secs`,
/// not `stale.interval.secs`.
fn env_provider() -> Env {
    Env::prefixed("TICKETS_").map(|key| {
        let key_str = key.as_str();
        let mapped = ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}
