// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StaleStore trait.

use async_trait::async_trait;
use tickets_config::model::StorageConfig;
use tickets_core::{MessageHandle, StaleRecord, StaleStore, TicketId, TicketsError, UserId};
use tracing::debug;

use crate::database::Database;
use crate::queries::stale_records;

/// Stale record store that persists every record to SQLite.
///
/// The database is authoritative: there is no in-process cache, so a record
/// written before a restart is visible after it.
pub struct SqliteStaleStore {
    db: Database,
}

impl SqliteStaleStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the configured database and wrap it.
    pub async fn open(config: &StorageConfig) -> Result<Self, TicketsError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        Ok(Self::new(db))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint and close the underlying database.
    pub async fn close(self) -> Result<(), TicketsError> {
        self.db.close().await
    }
}

#[async_trait]
impl StaleStore for SqliteStaleStore {
    async fn get(&self, ticket_id: &TicketId) -> Result<Option<StaleRecord>, TicketsError> {
        stale_records::get_record(&self.db, ticket_id).await
    }

    async fn set(&self, record: StaleRecord) -> Result<(), TicketsError> {
        stale_records::upsert_record(&self.db, &record).await?;
        debug!(ticket_id = %record.ticket_id, "stale record stored");
        Ok(())
    }

    async fn delete(&self, ticket_id: &TicketId) -> Result<bool, TicketsError> {
        stale_records::delete_record(&self.db, ticket_id).await
    }

    async fn size(&self) -> Result<usize, TicketsError> {
        stale_records::count_records(&self.db).await
    }

    async fn insert_if_absent(&self, record: StaleRecord) -> Result<bool, TicketsError> {
        stale_records::insert_record_if_absent(&self.db, &record).await
    }

    async fn remove(&self, ticket_id: &TicketId) -> Result<Option<StaleRecord>, TicketsError> {
        stale_records::take_record(&self.db, ticket_id).await
    }

    async fn replace(&self, record: StaleRecord) -> Result<bool, TicketsError> {
        stale_records::replace_record(&self.db, &record).await
    }

    async fn set_last_notice(
        &self,
        ticket_id: &TicketId,
        handle: MessageHandle,
    ) -> Result<bool, TicketsError> {
        stale_records::update_last_notice(&self.db, ticket_id, &handle).await
    }

    async fn set_closed_by(
        &self,
        ticket_id: &TicketId,
        user_id: &UserId,
    ) -> Result<bool, TicketsError> {
        stale_records::update_closed_by(&self.db, ticket_id, user_id).await
    }

    async fn record_message(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Option<StaleRecord>, TicketsError> {
        stale_records::increment_messages(&self.db, ticket_id).await
    }

    async fn list(&self) -> Result<Vec<StaleRecord>, TicketsError> {
        stale_records::list_records(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use tempfile::tempdir;
    use tickets_core::REASON_INACTIVITY;

    fn storage_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            persist_stale: true,
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempdir().unwrap();
        let config = storage_config(&dir.path().join("tickets.db"));
        let since = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let record = StaleRecord::new(
            TicketId::from("t1"),
            since,
            Some(TimeDelta::hours(1)),
            REASON_INACTIVITY,
        );

        let store = SqliteStaleStore::open(&config).await.unwrap();
        assert!(store.insert_if_absent(record.clone()).await.unwrap());
        store.close().await.unwrap();

        let reopened = SqliteStaleStore::open(&config).await.unwrap();
        assert_eq!(reopened.size().await.unwrap(), 1);
        let recovered = reopened.get(&record.ticket_id).await.unwrap().unwrap();
        assert_eq!(recovered.stale_since, since);
        assert_eq!(recovered.close_at, record.close_at);
        reopened.close().await.unwrap();
    }

    #[tokio::test]
    async fn trait_operations_delegate_to_queries() {
        let store = SqliteStaleStore::new(Database::open_in_memory().await.unwrap());
        let since = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let record = StaleRecord::new(TicketId::from("t2"), since, None, REASON_INACTIVITY);

        store.set(record.clone()).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![record.clone()]);
        assert_eq!(
            store
                .record_message(&record.ticket_id)
                .await
                .unwrap()
                .unwrap()
                .messages_since_stale,
            1
        );
        assert!(store.remove(&record.ticket_id).await.unwrap().is_some());
        assert!(!store.delete(&record.ticket_id).await.unwrap());
        assert_eq!(store.size().await.unwrap(), 0);
    }
}
