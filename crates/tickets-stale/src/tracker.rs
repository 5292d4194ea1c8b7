// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity feedback for stale tickets.
//!
//! The sweep only moves tickets forward. [`StaleTracker`] is called from the
//! message and close paths of the host bot to count activity on stale
//! tickets, optionally return them to Active, and remember who asked for a
//! close.

use std::sync::Arc;

use tracing::{debug, info};

use tickets_config::model::StaleConfig;
use tickets_core::{StaleRecord, StaleStore, TicketId, TicketsError, UserId};

/// Result of [`StaleTracker::note_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityOutcome {
    /// The ticket is not stale.
    NotStale,
    /// The message was counted. Holds the new count.
    Counted(u32),
    /// The ticket reached the reactivation threshold and is Active again.
    /// Holds the removed record so the caller can retract its notices.
    Reactivated(StaleRecord),
}

pub struct StaleTracker {
    store: Arc<dyn StaleStore>,
    reactivate_after: Option<u32>,
}

impl StaleTracker {
    pub fn new(store: Arc<dyn StaleStore>, reactivate_after: Option<u32>) -> Self {
        Self {
            store,
            reactivate_after: reactivate_after.filter(|n| *n > 0),
        }
    }

    pub fn from_config(store: Arc<dyn StaleStore>, config: &StaleConfig) -> Self {
        Self::new(store, config.reactivate_after_messages)
    }

    /// Count a non-bot message posted in a ticket.
    pub async fn note_message(&self, ticket_id: &TicketId) -> Result<ActivityOutcome, TicketsError> {
        let Some(record) = self.store.record_message(ticket_id).await? else {
            return Ok(ActivityOutcome::NotStale);
        };
        let count = record.messages_since_stale;

        match self.reactivate_after {
            Some(threshold) if count >= threshold => match self.store.remove(ticket_id).await? {
                Some(removed) => {
                    info!(ticket_id = %ticket_id, messages = count, "stale ticket reactivated");
                    Ok(ActivityOutcome::Reactivated(removed))
                }
                // Closed or reactivated concurrently.
                None => Ok(ActivityOutcome::NotStale),
            },
            _ => {
                debug!(ticket_id = %ticket_id, messages = count, "activity on stale ticket");
                Ok(ActivityOutcome::Counted(count))
            }
        }
    }

    /// Record who initiated a close on a stale ticket. Returns false if the
    /// ticket is not stale.
    pub async fn mark_closed_by(
        &self,
        ticket_id: &TicketId,
        user_id: &UserId,
    ) -> Result<bool, TicketsError> {
        self.store.set_closed_by(ticket_id, user_id).await
    }

    /// Stop tracking a ticket that was closed or deleted by other means.
    pub async fn forget(&self, ticket_id: &TicketId) -> Result<bool, TicketsError> {
        self.store.delete(ticket_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use tickets_core::REASON_INACTIVITY;
    use tickets_test_utils::fixtures;

    use crate::store::MemoryStaleStore;

    async fn stale_store(id: &str) -> Arc<MemoryStaleStore> {
        let store = Arc::new(MemoryStaleStore::new());
        store
            .set(StaleRecord::new(
                TicketId::from(id),
                fixtures::epoch(),
                Some(TimeDelta::hours(12)),
                REASON_INACTIVITY,
            ))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn message_on_active_ticket_is_ignored() {
        let store = Arc::new(MemoryStaleStore::new());
        let tracker = StaleTracker::new(store.clone(), Some(1));
        let outcome = tracker.note_message(&TicketId::from("t1")).await.unwrap();
        assert_eq!(outcome, ActivityOutcome::NotStale);
        assert_eq!(store.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn without_threshold_messages_are_only_counted() {
        let store = stale_store("t1").await;
        let tracker = StaleTracker::new(store.clone(), None);
        let id = TicketId::from("t1");
        for expected in 1..=5 {
            assert_eq!(
                tracker.note_message(&id).await.unwrap(),
                ActivityOutcome::Counted(expected)
            );
        }
        assert!(store.get(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn threshold_reactivates_ticket() {
        let store = stale_store("t1").await;
        let tracker = StaleTracker::new(store.clone(), Some(2));
        let id = TicketId::from("t1");

        assert_eq!(
            tracker.note_message(&id).await.unwrap(),
            ActivityOutcome::Counted(1)
        );
        match tracker.note_message(&id).await.unwrap() {
            ActivityOutcome::Reactivated(record) => {
                assert_eq!(record.ticket_id, id);
                assert_eq!(record.messages_since_stale, 2);
            }
            other => panic!("expected reactivation, got {other:?}"),
        }
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn zero_threshold_never_reactivates() {
        let store = stale_store("t1").await;
        let tracker = StaleTracker::new(store.clone(), Some(0));
        let outcome = tracker.note_message(&TicketId::from("t1")).await.unwrap();
        assert_eq!(outcome, ActivityOutcome::Counted(1));
    }

    #[tokio::test]
    async fn mark_closed_by_updates_stale_record_only() {
        let store = stale_store("t1").await;
        let tracker = StaleTracker::new(store.clone(), None);
        let staff = UserId::from("staff");

        assert!(tracker
            .mark_closed_by(&TicketId::from("t1"), &staff)
            .await
            .unwrap());
        assert!(!tracker
            .mark_closed_by(&TicketId::from("t2"), &staff)
            .await
            .unwrap());

        let record = store.get(&TicketId::from("t1")).await.unwrap().unwrap();
        assert_eq!(record.closed_by, Some(staff));
        assert!(store.get(&TicketId::from("t2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn forget_drops_record() {
        let store = stale_store("t1").await;
        let tracker = StaleTracker::new(store.clone(), None);
        assert!(tracker.forget(&TicketId::from("t1")).await.unwrap());
        assert_eq!(store.size().await.unwrap(), 0);
    }
}
