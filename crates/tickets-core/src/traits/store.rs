// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stale state store trait.
//!
//! The store is the only shared mutable state touched by the sweep. Besides
//! plain `get`/`set`/`delete`, it exposes conditional operations so that two
//! concurrent evaluations of the same ticket can never both create a record
//! or both close the ticket.

use async_trait::async_trait;

use crate::error::TicketsError;
use crate::types::{MessageHandle, StaleRecord, TicketId, UserId};

/// Keyed storage of [`StaleRecord`]s, one per ticket currently in the stale phase.
#[async_trait]
pub trait StaleStore: Send + Sync + 'static {
    /// Look up the record for a ticket.
    async fn get(&self, ticket_id: &TicketId) -> Result<Option<StaleRecord>, TicketsError>;

    /// Insert or overwrite the record keyed by `record.ticket_id`.
    async fn set(&self, record: StaleRecord) -> Result<(), TicketsError>;

    /// Delete the record for a ticket. Returns whether a record existed.
    async fn delete(&self, ticket_id: &TicketId) -> Result<bool, TicketsError>;

    /// Number of tickets currently tracked as stale.
    async fn size(&self) -> Result<usize, TicketsError>;

    /// Insert the record only if the ticket has none. Returns whether it was inserted.
    async fn insert_if_absent(&self, record: StaleRecord) -> Result<bool, TicketsError>;

    /// Atomically remove and return the record for a ticket, if present.
    async fn remove(&self, ticket_id: &TicketId) -> Result<Option<StaleRecord>, TicketsError>;

    /// Overwrite the record only if the ticket still has one. Returns whether it was replaced.
    async fn replace(&self, record: StaleRecord) -> Result<bool, TicketsError>;

    /// Set `last_notice` on an existing record, leaving every other field as stored.
    /// Returns whether the ticket had a record.
    async fn set_last_notice(
        &self,
        ticket_id: &TicketId,
        handle: MessageHandle,
    ) -> Result<bool, TicketsError>;

    /// Set `closed_by` on an existing record, leaving every other field as stored.
    /// Returns whether the ticket had a record.
    async fn set_closed_by(
        &self,
        ticket_id: &TicketId,
        user_id: &UserId,
    ) -> Result<bool, TicketsError>;

    /// Increment `messages_since_stale` and return the updated record, if present.
    async fn record_message(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Option<StaleRecord>, TicketsError>;

    /// All tracked records, ordered by `stale_since`.
    async fn list(&self) -> Result<Vec<StaleRecord>, TicketsError>;
}
