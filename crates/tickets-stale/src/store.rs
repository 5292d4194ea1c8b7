// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local stale record store.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use tickets_core::{MessageHandle, StaleRecord, StaleStore, TicketId, TicketsError, UserId};

/// In-memory [`StaleStore`] backed by a [`DashMap`].
///
/// Conditional operations hold the shard lock for the key while they check
/// and mutate, so concurrent evaluations of the same ticket serialize.
/// Records are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStaleStore {
    records: DashMap<TicketId, StaleRecord>,
}

impl MemoryStaleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StaleStore for MemoryStaleStore {
    async fn get(&self, ticket_id: &TicketId) -> Result<Option<StaleRecord>, TicketsError> {
        Ok(self.records.get(ticket_id).map(|r| r.value().clone()))
    }

    async fn set(&self, record: StaleRecord) -> Result<(), TicketsError> {
        self.records.insert(record.ticket_id.clone(), record);
        Ok(())
    }

    async fn delete(&self, ticket_id: &TicketId) -> Result<bool, TicketsError> {
        Ok(self.records.remove(ticket_id).is_some())
    }

    async fn size(&self) -> Result<usize, TicketsError> {
        Ok(self.records.len())
    }

    async fn insert_if_absent(&self, record: StaleRecord) -> Result<bool, TicketsError> {
        match self.records.entry(record.ticket_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(true)
            }
        }
    }

    async fn remove(&self, ticket_id: &TicketId) -> Result<Option<StaleRecord>, TicketsError> {
        Ok(self.records.remove(ticket_id).map(|(_, record)| record))
    }

    async fn replace(&self, record: StaleRecord) -> Result<bool, TicketsError> {
        match self.records.get_mut(&record.ticket_id) {
            Some(mut existing) => {
                *existing = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_last_notice(
        &self,
        ticket_id: &TicketId,
        handle: MessageHandle,
    ) -> Result<bool, TicketsError> {
        match self.records.get_mut(ticket_id) {
            Some(mut record) => {
                record.last_notice = Some(handle);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_closed_by(
        &self,
        ticket_id: &TicketId,
        user_id: &UserId,
    ) -> Result<bool, TicketsError> {
        match self.records.get_mut(ticket_id) {
            Some(mut record) => {
                record.closed_by = Some(user_id.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_message(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Option<StaleRecord>, TicketsError> {
        Ok(self.records.get_mut(ticket_id).map(|mut record| {
            record.messages_since_stale = record.messages_since_stale.saturating_add(1);
            record.clone()
        }))
    }

    async fn list(&self) -> Result<Vec<StaleRecord>, TicketsError> {
        let mut records: Vec<StaleRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| {
            a.stale_since
                .cmp(&b.stale_since)
                .then_with(|| a.ticket_id.cmp(&b.ticket_id))
        });
        Ok(records)
    }
}
