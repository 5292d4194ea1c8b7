// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tickets stale` command implementation.
//!
//! Inspects and edits the persisted stale record store. Only meaningful when
//! `storage.persist_stale` is enabled; in-memory records belong to the
//! running bot process and are not reachable from here.

use std::io::IsTerminal;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tickets_config::model::StorageConfig;
use tickets_core::{StaleRecord, StaleStore, TicketId, TicketsError};
use tickets_storage::SqliteStaleStore;

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StaleListing {
    pub count: usize,
    pub records: Vec<StaleRecord>,
}

async fn open_persisted(config: &StorageConfig) -> Result<SqliteStaleStore, TicketsError> {
    if !config.persist_stale {
        return Err(TicketsError::Config(
            "stale records are not persisted (storage.persist_stale = false)".to_string(),
        ));
    }
    SqliteStaleStore::open(config).await
}

/// Read every persisted record, oldest stale first.
pub async fn load_listing(config: &StorageConfig) -> Result<StaleListing, TicketsError> {
    let store = open_persisted(config).await?;
    let records = store.list().await?;
    let count = store.size().await?;
    store.close().await?;
    Ok(StaleListing { count, records })
}

/// Run `tickets stale list`.
pub async fn run_list(config: &StorageConfig, json: bool, plain: bool) -> Result<(), TicketsError> {
    let listing = load_listing(config).await?;
    if json {
        let out = serde_json::to_string_pretty(&listing)
            .map_err(|e| TicketsError::Internal(format!("failed to encode listing: {e}")))?;
        println!("{out}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print!("{}", render_listing(&listing, Utc::now(), use_color));
    }
    Ok(())
}

/// Run `tickets stale clear <ticket_id>`. Returns whether a record was removed.
pub async fn run_clear(config: &StorageConfig, ticket_id: &str) -> Result<bool, TicketsError> {
    let store = open_persisted(config).await?;
    let removed = store.delete(&TicketId::from(ticket_id)).await?;
    store.close().await?;
    if removed {
        println!("cleared stale record for ticket {ticket_id}");
    } else {
        println!("ticket {ticket_id} is not stale");
    }
    Ok(removed)
}

fn format_close(record: &StaleRecord, now: DateTime<Utc>) -> String {
    match record.close_at {
        None => "never".to_string(),
        Some(close_at) if close_at <= now => "due".to_string(),
        Some(close_at) => {
            let minutes = (close_at - now).num_minutes();
            if minutes >= 60 {
                format!("in {}h {}m", minutes / 60, minutes % 60)
            } else {
                format!("in {minutes}m")
            }
        }
    }
}

/// Render the listing as a plain-text table.
pub fn render_listing(listing: &StaleListing, now: DateTime<Utc>, use_color: bool) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  stale tickets: {}\n", listing.count));
    out.push_str(&format!("  {}\n", "-".repeat(60)));

    if listing.records.is_empty() {
        out.push_str("    (none)\n");
        return out;
    }

    for record in &listing.records {
        let closes = format_close(record, now);
        let closes = if use_color {
            use colored::Colorize;
            match record.close_at {
                Some(close_at) if close_at <= now => closes.red().to_string(),
                Some(_) => closes.yellow().to_string(),
                None => closes.dimmed().to_string(),
            }
        } else {
            closes
        };
        out.push_str(&format!(
            "    {:<24} since {}  closes {}  messages {}\n",
            record.ticket_id,
            record.stale_since.format("%Y-%m-%d %H:%M"),
            closes,
            record.messages_since_stale,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use tickets_core::REASON_INACTIVITY;
    use tickets_test_utils::fixtures;

    fn storage_in(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            persist_stale: true,
            database_path: dir.path().join("tickets.db").display().to_string(),
            wal_mode: true,
        }
    }

    fn record(id: &str, auto_close: Option<TimeDelta>) -> StaleRecord {
        StaleRecord::new(
            TicketId::from(id),
            fixtures::epoch(),
            auto_close,
            REASON_INACTIVITY,
        )
    }

    #[tokio::test]
    async fn listing_reads_persisted_records() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        let store = SqliteStaleStore::open(&storage).await.unwrap();
        store.set(record("t1", Some(TimeDelta::hours(1)))).await.unwrap();
        store.set(record("t2", None)).await.unwrap();
        store.close().await.unwrap();

        let listing = load_listing(&storage).await.unwrap();
        assert_eq!(listing.count, 2);
        assert_eq!(listing.records[0].ticket_id, TicketId::from("t1"));

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["records"][1]["ticket_id"], "t2");
    }

    #[tokio::test]
    async fn clear_removes_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        let store = SqliteStaleStore::open(&storage).await.unwrap();
        store.set(record("t1", None)).await.unwrap();
        store.close().await.unwrap();

        assert!(run_clear(&storage, "t1").await.unwrap());
        assert!(!run_clear(&storage, "t1").await.unwrap());
        assert_eq!(load_listing(&storage).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn in_memory_mode_is_rejected() {
        let storage = StorageConfig {
            persist_stale: false,
            ..StorageConfig::default()
        };
        let err = load_listing(&storage).await.unwrap_err();
        assert!(matches!(err, TicketsError::Config(_)));
    }

    #[test]
    fn render_shows_close_times() {
        let now = fixtures::epoch() + TimeDelta::minutes(30);
        let listing = StaleListing {
            count: 3,
            records: vec![
                record("hourly", Some(TimeDelta::hours(2))),
                record("quick", Some(TimeDelta::minutes(10))),
                record("forever", None),
            ],
        };
        let out = render_listing(&listing, now, false);
        assert!(out.contains("stale tickets: 3"));
        assert!(out.contains("in 1h 30m"));
        assert!(out.contains("due"));
        assert!(out.contains("never"));
    }

    #[test]
    fn render_empty_listing() {
        let listing = StaleListing {
            count: 0,
            records: vec![],
        };
        assert!(render_listing(&listing, fixtures::epoch(), false).contains("(none)"));
    }
}
