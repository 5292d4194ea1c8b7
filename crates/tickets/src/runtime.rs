// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store selection, tracing setup and scheduler startup.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tickets_config::model::StorageConfig;
use tickets_config::TicketsConfig;
use tickets_core::{StaleStore, TicketsError};
use tickets_stale::{
    Collaborators, MemoryStaleStore, ScheduledSweep, StaleSweeper, StaleTracker, SweepSettings,
};
use tickets_storage::SqliteStaleStore;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise every `tickets*` target logs at
/// `log_level` and everything else at `warn`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tickets={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Open the stale record store selected by `storage.persist_stale`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn StaleStore>, TicketsError> {
    if config.persist_stale {
        let store = SqliteStaleStore::open(config).await?;
        info!(path = %config.database_path, "stale records persisted to sqlite");
        Ok(Arc::new(store))
    } else {
        info!("stale records kept in memory only");
        Ok(Arc::new(MemoryStaleStore::new()))
    }
}

/// A running (or disabled) stale sweep.
pub struct StaleRuntime {
    sweeper: Arc<StaleSweeper>,
    tracker: Arc<StaleTracker>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl StaleRuntime {
    pub fn sweeper(&self) -> &Arc<StaleSweeper> {
        &self.sweeper
    }

    /// Activity hook for the host's message and close handlers.
    pub fn tracker(&self) -> &Arc<StaleTracker> {
        &self.tracker
    }

    /// Whether the periodic sweep was started.
    pub fn is_scheduled(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the scheduler and wait for any in-flight sweep to finish.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "stale sweep task ended abnormally");
            }
        }
    }
}

/// Build the sweep from configuration and start its scheduler.
///
/// The scheduler runs under a child of `shutdown`. When `stale.enabled` is
/// false nothing is scheduled, but the tracker still works so activity on
/// previously stale tickets is recorded.
pub async fn start_stale_sweep(
    config: &TicketsConfig,
    collaborators: Collaborators,
    shutdown: &CancellationToken,
) -> Result<StaleRuntime, TicketsError> {
    let store = open_store(&config.storage).await?;
    let settings = SweepSettings::from_config(&config.stale)?;
    let tracker = Arc::new(StaleTracker::from_config(store.clone(), &config.stale));
    let sweeper = Arc::new(StaleSweeper::new(collaborators, store, settings));

    let scheduled = ScheduledSweep::new(sweeper.clone(), config.stale.interval(), shutdown);
    let cancel = scheduled.cancellation_token();

    let handle = if config.stale.enabled {
        info!(
            interval_secs = config.stale.interval_secs,
            max_concurrency = config.stale.max_concurrency,
            reactivate_after = ?config.stale.reactivate_after_messages,
            "stale sweep enabled"
        );
        Some(scheduled.spawn())
    } else {
        debug!("stale sweep disabled");
        None
    };

    Ok(StaleRuntime {
        sweeper,
        tracker,
        cancel,
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickets_core::{StaleRecord, TicketId, REASON_INACTIVITY};
    use tickets_test_utils::{
        fixtures, MockChannelGateway, MockCloser, MockStaffClassifier, MockTicketSource,
    };

    fn collaborators() -> Collaborators {
        Collaborators {
            source: Arc::new(MockTicketSource::new(vec![])),
            gateway: Arc::new(MockChannelGateway::new()),
            staff: Arc::new(MockStaffClassifier::new()),
            closer: Arc::new(MockCloser::new()),
        }
    }

    fn memory_config() -> TicketsConfig {
        let mut config = TicketsConfig::default();
        config.storage.persist_stale = false;
        config
    }

    #[tokio::test]
    async fn open_store_honours_persistence_flag() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            persist_stale: true,
            database_path: dir.path().join("stale.db").display().to_string(),
            wal_mode: true,
        };
        let store = open_store(&storage).await.unwrap();
        store
            .set(StaleRecord::new(
                TicketId::from("t1"),
                fixtures::epoch(),
                None,
                REASON_INACTIVITY,
            ))
            .await
            .unwrap();
        assert!(dir.path().join("stale.db").exists());

        let memory = open_store(&memory_config().storage).await.unwrap();
        assert_eq!(memory.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn enabled_sweep_is_scheduled_and_stops_on_shutdown() {
        let shutdown = CancellationToken::new();
        let runtime = start_stale_sweep(&memory_config(), collaborators(), &shutdown)
            .await
            .unwrap();
        assert!(runtime.is_scheduled());

        shutdown.cancel();
        runtime.stop().await;
    }

    #[tokio::test]
    async fn disabled_sweep_still_tracks_activity() {
        let mut config = memory_config();
        config.stale.enabled = false;
        config.stale.reactivate_after_messages = Some(1);

        let shutdown = CancellationToken::new();
        let runtime = start_stale_sweep(&config, collaborators(), &shutdown)
            .await
            .unwrap();
        assert!(!runtime.is_scheduled());

        runtime
            .sweeper()
            .store()
            .set(StaleRecord::new(
                TicketId::from("t1"),
                fixtures::epoch(),
                None,
                REASON_INACTIVITY,
            ))
            .await
            .unwrap();
        let outcome = runtime
            .tracker()
            .note_message(&TicketId::from("t1"))
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            tickets_stale::ActivityOutcome::Reactivated(_)
        ));
        runtime.stop().await;
    }
}
