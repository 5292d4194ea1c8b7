// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket/guild snapshot source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TicketsError;
use crate::types::GuildTickets;

/// Supplies the open tickets that are candidates for staleness, grouped by guild.
#[async_trait]
pub trait TicketSource: Send + Sync + 'static {
    /// Fetch every guild with staleness configured, together with its open tickets.
    ///
    /// An error here aborts the whole sweep.
    async fn fetch_stale_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<GuildTickets>, TicketsError>;
}
