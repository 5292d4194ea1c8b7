// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock ticket source.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use tickets_core::{GuildTickets, Ticket, TicketSource, TicketsError};

/// A ticket source that returns a configurable snapshot.
#[derive(Default)]
pub struct MockTicketSource {
    guilds: Mutex<Vec<GuildTickets>>,
    fail_next: AtomicBool,
    fetches: AtomicUsize,
}

impl MockTicketSource {
    pub fn new(guilds: Vec<GuildTickets>) -> Self {
        Self {
            guilds: Mutex::new(guilds),
            ..Self::default()
        }
    }

    /// Replace the snapshot returned by subsequent fetches.
    pub async fn set_guilds(&self, guilds: Vec<GuildTickets>) {
        *self.guilds.lock().await = guilds;
    }

    /// Replace one ticket (matched by id) in the snapshot.
    pub async fn update_ticket(&self, ticket: Ticket) {
        let mut guilds = self.guilds.lock().await;
        for guild in guilds.iter_mut() {
            for existing in guild.tickets.iter_mut() {
                if existing.id == ticket.id {
                    *existing = ticket.clone();
                }
            }
        }
    }

    /// Make the next fetch fail.
    pub fn fail_next_fetch(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of fetches served (including failed ones).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketSource for MockTicketSource {
    async fn fetch_stale_candidates(
        &self,
        _now: DateTime<Utc>,
    ) -> Result<Vec<GuildTickets>, TicketsError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TicketsError::Fetch {
                message: "mock source unavailable".into(),
                source: None,
            });
        }
        Ok(self.guilds.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn fetch_returns_snapshot_and_injected_failure() {
        let now = fixtures::epoch();
        let source = MockTicketSource::new(vec![GuildTickets {
            guild: fixtures::guild("g1", None, None),
            tickets: vec![],
        }]);

        source.fail_next_fetch();
        assert!(source.fetch_stale_candidates(now).await.is_err());
        let guilds = source.fetch_stale_candidates(now).await.unwrap();
        assert_eq!(guilds.len(), 1);
        assert_eq!(source.fetch_count(), 2);
    }
}
