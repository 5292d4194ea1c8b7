// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The stale sweep engine.
//!
//! One call to [`StaleSweeper::sweep`] takes a snapshot of open tickets from
//! the [`TicketSource`] and decides, for each ticket in a guild with
//! staleness enabled, whether to do nothing, mark it stale, send the
//! closing-soon warning, or close it. Every transition is conditional on the
//! store's current contents, so a duplicate evaluation of the same ticket
//! becomes a no-op instead of a second notice or a second close.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, trace, warn};

use tickets_config::model::StaleConfig;
use tickets_core::{
    Channel, ChannelGateway, CloseRequest, GuildSettings, MessageHandle, StaffClassifier,
    StaleRecord, StaleStore, Ticket, TicketCloser, TicketId, TicketSource, TicketsError,
    REASON_CHANNEL_DELETED, REASON_INACTIVITY,
};

use crate::{notice, policy};

/// External services the sweep talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn TicketSource>,
    pub gateway: Arc<dyn ChannelGateway>,
    pub staff: Arc<dyn StaffClassifier>,
    pub closer: Arc<dyn TicketCloser>,
}

/// Tuning for a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSettings {
    /// Period between sweeps. Guild thresholds below this are ignored and the
    /// closing-soon window is this wide.
    pub interval: TimeDelta,
    /// Number of recent messages handed to the ping policy.
    pub message_window: usize,
    /// Bound on each collaborator call.
    pub call_timeout: Duration,
    /// Tickets evaluated concurrently.
    pub max_concurrency: usize,
}

impl SweepSettings {
    pub fn from_config(config: &StaleConfig) -> Result<Self, TicketsError> {
        let interval = TimeDelta::from_std(config.interval()).map_err(|e| {
            TicketsError::Config(format!("stale.interval_secs is out of range: {e}"))
        })?;
        Ok(Self {
            interval,
            message_window: config.message_window,
            call_timeout: config.call_timeout(),
            max_concurrency: config.max_concurrency.max(1),
        })
    }
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            interval: TimeDelta::minutes(15),
            message_window: 5,
            call_timeout: Duration::from_secs(30),
            max_concurrency: 16,
        }
    }
}

/// Counters for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tickets evaluated.
    pub processed: usize,
    /// Tickets newly marked stale.
    pub marked: usize,
    /// Tickets closed, either on schedule or because their channel vanished.
    pub closed: usize,
    /// Closing-soon notices sent.
    pub warned: usize,
    /// Tickets whose evaluation failed.
    pub failed: usize,
    /// Records in the store after the sweep.
    pub stale: usize,
}

impl SweepReport {
    fn record(&mut self, outcome: TicketOutcome) {
        match outcome {
            TicketOutcome::Marked => self.marked += 1,
            TicketOutcome::Warned => self.warned += 1,
            TicketOutcome::Closed => self.closed += 1,
            TicketOutcome::Unchanged | TicketOutcome::Dropped => {}
        }
    }
}

/// What a single ticket evaluation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOutcome {
    Unchanged,
    /// Inactivity notice sent and record created.
    Marked,
    /// Closing-soon notice sent.
    Warned,
    /// Closer invoked successfully.
    Closed,
    /// Record discarded because the channel no longer exists.
    Dropped,
}

/// Evaluates open tickets against their guild's staleness settings.
pub struct StaleSweeper {
    collaborators: Collaborators,
    store: Arc<dyn StaleStore>,
    settings: SweepSettings,
}

impl StaleSweeper {
    pub fn new(
        collaborators: Collaborators,
        store: Arc<dyn StaleStore>,
        settings: SweepSettings,
    ) -> Self {
        Self {
            collaborators,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &Arc<dyn StaleStore> {
        &self.store
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Run one sweep as of `now`.
    ///
    /// Fails only if the ticket snapshot cannot be fetched. Per-ticket
    /// failures are logged and counted in [`SweepReport::failed`].
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, TicketsError> {
        let guilds = self
            .call(self.collaborators.source.fetch_stale_candidates(now))
            .await?;

        let mut candidates = Vec::new();
        for entry in guilds {
            let Some(threshold) = entry.guild.stale_threshold(self.settings.interval) else {
                trace!(guild_id = %entry.guild.guild_id, "staleness disabled for guild");
                continue;
            };
            let guild = Arc::new(entry.guild);
            candidates.extend(
                entry
                    .tickets
                    .into_iter()
                    .filter(|ticket| ticket.open)
                    .map(|ticket| (guild.clone(), threshold, ticket)),
            );
        }

        let outcomes: Vec<(TicketId, Result<TicketOutcome, TicketsError>)> =
            stream::iter(candidates)
                .map(|(guild, threshold, ticket)| self.evaluate(guild, threshold, ticket, now))
                .buffer_unordered(self.settings.max_concurrency.max(1))
                .collect()
                .await;

        let mut report = SweepReport::default();
        for (ticket_id, outcome) in outcomes {
            report.processed += 1;
            match outcome {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    report.failed += 1;
                    error!(ticket_id = %ticket_id, error = %e, "stale check failed");
                }
            }
        }

        report.stale = match self.store.size().await {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "could not read stale store size");
                0
            }
        };

        info!(
            processed = report.processed,
            marked = report.marked,
            closed = report.closed,
            failed = report.failed,
            warned = report.warned,
            stale = report.stale,
            "stale sweep complete"
        );
        Ok(report)
    }

    async fn evaluate(
        &self,
        guild: Arc<GuildSettings>,
        threshold: TimeDelta,
        ticket: Ticket,
        now: DateTime<Utc>,
    ) -> (TicketId, Result<TicketOutcome, TicketsError>) {
        let outcome = match self.store.get(&ticket.id).await {
            Ok(Some(record)) => self.advance(&guild, &ticket, record, now).await,
            Ok(None) => self.check_activity(&guild, threshold, &ticket, now).await,
            Err(e) => Err(e),
        };
        (ticket.id, outcome)
    }

    /// Active ticket: mark it stale once it has been idle long enough.
    async fn check_activity(
        &self,
        guild: &GuildSettings,
        threshold: TimeDelta,
        ticket: &Ticket,
        now: DateTime<Utc>,
    ) -> Result<TicketOutcome, TicketsError> {
        let idle = ticket.idle_for(now);
        if idle < threshold {
            trace!(ticket_id = %ticket.id, idle_secs = idle.num_seconds(), "ticket active");
            return Ok(TicketOutcome::Unchanged);
        }

        let Some(channel) = self
            .call(self.collaborators.gateway.resolve_channel(&ticket.id))
            .await?
        else {
            return self.close_missing(ticket).await;
        };

        match self.mark_stale(guild, ticket, &channel, now).await {
            Err(e) if e.is_channel_not_found() => self.close_missing(ticket).await,
            other => other,
        }
    }

    async fn mark_stale(
        &self,
        guild: &GuildSettings,
        ticket: &Ticket,
        channel: &Channel,
        now: DateTime<Utc>,
    ) -> Result<TicketOutcome, TicketsError> {
        let recent = self
            .call(
                self.collaborators
                    .gateway
                    .recent_non_bot_messages(channel, self.settings.message_window),
            )
            .await?;
        let mentions = self
            .call(policy::resolve_mentions(
                self.collaborators.staff.as_ref(),
                &guild.guild_id,
                ticket,
                &recent,
            ))
            .await?;
        let notice = notice::inactive(guild, ticket.last_activity(), mentions);

        let record =
            StaleRecord::new(ticket.id.clone(), now, guild.auto_close, REASON_INACTIVITY);
        let close_at = record.close_at;
        if !self.store.insert_if_absent(record).await? {
            debug!(ticket_id = %ticket.id, "ticket already marked stale by another evaluation");
            return Ok(TicketOutcome::Unchanged);
        }

        let handle = match self
            .call(self.collaborators.gateway.send_notice(channel, notice))
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                self.release(&ticket.id).await;
                return Err(e);
            }
        };

        info!(
            ticket_id = %ticket.id,
            guild_id = %guild.guild_id,
            close_at = ?close_at,
            "ticket marked stale"
        );
        self.note_notice(&ticket.id, handle).await;
        Ok(TicketOutcome::Marked)
    }

    /// Stale ticket: send the closing-soon warning or close when due.
    async fn advance(
        &self,
        guild: &GuildSettings,
        ticket: &Ticket,
        record: StaleRecord,
        now: DateTime<Utc>,
    ) -> Result<TicketOutcome, TicketsError> {
        let Some(channel) = self
            .call(self.collaborators.gateway.resolve_channel(&ticket.id))
            .await?
        else {
            return self.drop_record(&ticket.id).await;
        };

        let (Some(close_at), Some(halfway)) = (record.close_at, record.halfway()) else {
            trace!(ticket_id = %ticket.id, "stale ticket has no auto-close");
            return Ok(TicketOutcome::Unchanged);
        };

        if now >= halfway && now < halfway + self.settings.interval {
            let notice = notice::closing_soon(guild, close_at + self.settings.interval);
            let handle = match self
                .call(self.collaborators.gateway.send_notice(&channel, notice))
                .await
            {
                Ok(handle) => handle,
                Err(e) if e.is_channel_not_found() => return self.drop_record(&ticket.id).await,
                Err(e) => return Err(e),
            };

            info!(ticket_id = %ticket.id, close_at = %close_at, "closing-soon notice sent");
            self.note_notice(&ticket.id, handle).await;
            return Ok(TicketOutcome::Warned);
        }

        if record.is_due(now) {
            return self.close_due(ticket).await;
        }

        Ok(TicketOutcome::Unchanged)
    }

    async fn close_due(&self, ticket: &Ticket) -> Result<TicketOutcome, TicketsError> {
        let Some(claimed) = self.store.remove(&ticket.id).await? else {
            debug!(ticket_id = %ticket.id, "stale record already claimed");
            return Ok(TicketOutcome::Unchanged);
        };

        let request = CloseRequest {
            reason: claimed.reason.clone(),
            closed_by: claimed.closed_by.clone(),
            record: Some(claimed.clone()),
        };
        if let Err(e) = self
            .call(self.collaborators.closer.close_ticket(&ticket.id, request))
            .await
        {
            if let Err(restore) = self.store.insert_if_absent(claimed).await {
                error!(
                    ticket_id = %ticket.id,
                    error = %restore,
                    "failed to restore stale record after close failure"
                );
            }
            return Err(e);
        }

        info!(ticket_id = %ticket.id, "stale ticket closed");
        Ok(TicketOutcome::Closed)
    }

    async fn close_missing(&self, ticket: &Ticket) -> Result<TicketOutcome, TicketsError> {
        warn!(ticket_id = %ticket.id, "ticket channel missing, closing ticket");
        let request = CloseRequest {
            reason: REASON_CHANNEL_DELETED.to_string(),
            closed_by: None,
            record: None,
        };
        self.call(self.collaborators.closer.close_ticket(&ticket.id, request))
            .await?;
        Ok(TicketOutcome::Closed)
    }

    async fn drop_record(&self, ticket_id: &TicketId) -> Result<TicketOutcome, TicketsError> {
        if self.store.delete(ticket_id).await? {
            info!(ticket_id = %ticket_id, "stale ticket channel missing, record dropped");
        }
        Ok(TicketOutcome::Dropped)
    }

    /// Remember the last notice on the record. The notice is already out, so a
    /// store failure here does not fail the transition.
    async fn note_notice(&self, ticket_id: &TicketId, handle: MessageHandle) {
        match self.store.set_last_notice(ticket_id, handle).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(ticket_id = %ticket_id, "stale record gone before notice was recorded")
            }
            Err(e) => warn!(ticket_id = %ticket_id, error = %e, "notice sent but not recorded"),
        }
    }

    /// Undo a reservation made by [`Self::mark_stale`].
    async fn release(&self, ticket_id: &TicketId) {
        if let Err(e) = self.store.delete(ticket_id).await {
            error!(ticket_id = %ticket_id, error = %e, "failed to release stale reservation");
        }
    }

    async fn call<T, F>(&self, fut: F) -> Result<T, TicketsError>
    where
        F: Future<Output = Result<T, TicketsError>>,
    {
        let duration = self.settings.call_timeout;
        tokio::time::timeout(duration, fut)
            .await
            .unwrap_or(Err(TicketsError::Timeout { duration }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let config = StaleConfig {
            interval_secs: 600,
            message_window: 8,
            call_timeout_secs: 3,
            max_concurrency: 0,
            ..StaleConfig::default()
        };
        let settings = SweepSettings::from_config(&config).unwrap();
        assert_eq!(settings.interval, TimeDelta::minutes(10));
        assert_eq!(settings.message_window, 8);
        assert_eq!(settings.call_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_concurrency, 1);
    }

    #[test]
    fn default_settings_match_default_config() {
        let from_config = SweepSettings::from_config(&StaleConfig::default()).unwrap();
        assert_eq!(from_config, SweepSettings::default());
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = SweepReport::default();
        for outcome in [
            TicketOutcome::Marked,
            TicketOutcome::Marked,
            TicketOutcome::Warned,
            TicketOutcome::Closed,
            TicketOutcome::Dropped,
            TicketOutcome::Unchanged,
        ] {
            report.record(outcome);
        }
        assert_eq!(report.marked, 2);
        assert_eq!(report.warned, 1);
        assert_eq!(report.closed, 1);
        assert_eq!(report.failed, 0);
    }
}
