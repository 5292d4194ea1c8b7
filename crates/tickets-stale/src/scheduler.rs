// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic execution of the stale sweep.
//!
//! The scheduler owns its own [`CancellationToken`], normally a child of the
//! process shutdown token, so it can be stopped without touching other
//! background tasks. Sweeps run inline on the scheduler task and never
//! overlap. A tick that comes due while a sweep is still running is skipped.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::StaleSweeper;

/// Fires a [`StaleSweeper`] every `period`.
pub struct ScheduledSweep {
    sweeper: Arc<StaleSweeper>,
    period: Duration,
    cancel: CancellationToken,
}

impl ScheduledSweep {
    /// Create a scheduler that stops when `parent` is cancelled.
    pub fn new(sweeper: Arc<StaleSweeper>, period: Duration, parent: &CancellationToken) -> Self {
        Self {
            sweeper,
            period,
            cancel: parent.child_token(),
        }
    }

    /// Token that stops this scheduler only.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the scheduler on a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until cancelled. The first sweep happens one period after start.
    pub async fn run(self) {
        self.log_recovered().await;

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first immediate tick.
        interval.tick().await;

        info!(period_secs = self.period.as_secs(), "stale sweep scheduler started");
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.fire().await;
                }
                _ = self.cancel.cancelled() => {
                    info!("stale sweep scheduler shutting down");
                    break;
                }
            }
        }
    }

    async fn fire(&self) {
        let started = Instant::now();
        match self.sweeper.sweep(Utc::now()).await {
            Ok(report) => {
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    failed = report.failed,
                    "stale sweep finished"
                );
            }
            Err(e) => {
                error!(error = %e, "stale sweep aborted");
            }
        }

        let elapsed = started.elapsed();
        if elapsed > self.period {
            warn!(
                elapsed_secs = elapsed.as_secs(),
                period_secs = self.period.as_secs(),
                "stale sweep overran its period, skipping missed firings"
            );
        }
    }

    async fn log_recovered(&self) {
        match self.sweeper.store().size().await {
            Ok(0) => {}
            Ok(count) => info!(count, "resuming tracking of stale tickets"),
            Err(e) => warn!(error = %e, "could not count recovered stale records"),
        }
    }
}
