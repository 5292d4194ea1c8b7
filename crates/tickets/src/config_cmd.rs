// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tickets config check` command implementation.

use tickets_config::TicketsConfig;
use tickets_core::TicketsError;

/// Render the effective configuration as TOML.
pub fn render_effective(config: &TicketsConfig) -> Result<String, TicketsError> {
    toml::to_string_pretty(config)
        .map_err(|e| TicketsError::Internal(format!("failed to render config: {e}")))
}

/// Run `tickets config check`. Loading already validated the config, so this
/// only reports it.
pub fn run_check(config: &TicketsConfig) -> Result<(), TicketsError> {
    println!("config OK\n");
    print!("{}", render_effective(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_config_round_trips() {
        let config = tickets_config::load_and_validate_str(
            "[stale]\ninterval_secs = 600\nreactivate_after_messages = 3\n",
        )
        .unwrap();
        let rendered = render_effective(&config).unwrap();
        assert!(rendered.contains("interval_secs = 600"));

        let reparsed = tickets_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }
}
