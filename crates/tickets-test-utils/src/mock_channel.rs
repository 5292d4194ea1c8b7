// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel gateway for deterministic testing.
//!
//! `MockChannelGateway` keeps a set of live channels keyed by ticket id, the
//! recent messages in each, and captures every notice sent for assertion.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tickets_core::{
    Channel, ChannelGateway, GuildId, MessageHandle, Notice, NoticeKind, RecentMessage, TicketId,
    TicketsError, UserId,
};

/// A notice captured by the mock.
#[derive(Debug, Clone)]
pub struct SentNotice {
    pub ticket_id: TicketId,
    pub notice: Notice,
    pub handle: MessageHandle,
}

/// A mock messaging transport.
#[derive(Default)]
pub struct MockChannelGateway {
    channels: Mutex<HashMap<TicketId, Channel>>,
    messages: Mutex<HashMap<TicketId, Vec<RecentMessage>>>,
    sent: Mutex<Vec<SentNotice>>,
    failing_sends: Mutex<HashSet<TicketId>>,
    failing_reads: Mutex<HashSet<TicketId>>,
    vanishing: Mutex<HashSet<TicketId>>,
    delays: Mutex<HashMap<TicketId, Duration>>,
    requested_limits: Mutex<Vec<usize>>,
    next_message: AtomicU64,
}

impl MockChannelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live channel for a ticket.
    pub async fn add_channel(&self, ticket_id: &str, guild_id: &str) {
        self.channels.lock().await.insert(
            TicketId::from(ticket_id),
            Channel {
                id: ticket_id.to_string(),
                guild_id: GuildId::from(guild_id),
            },
        );
    }

    /// Delete a ticket's channel.
    pub async fn remove_channel(&self, ticket_id: &str) {
        self.channels.lock().await.remove(&TicketId::from(ticket_id));
    }

    /// Set the recent non-bot messages for a channel, newest first.
    pub async fn set_recent_authors(&self, ticket_id: &str, authors: &[&str]) {
        let messages = authors
            .iter()
            .map(|a| RecentMessage {
                author_id: UserId::from(*a),
            })
            .collect();
        self.messages
            .lock()
            .await
            .insert(TicketId::from(ticket_id), messages);
    }

    /// Make every notice sent to this ticket fail.
    pub async fn fail_sends_for(&self, ticket_id: &str) {
        self.failing_sends.lock().await.insert(TicketId::from(ticket_id));
    }

    /// Make reading recent messages in this ticket fail.
    pub async fn fail_reads_for(&self, ticket_id: &str) {
        self.failing_reads.lock().await.insert(TicketId::from(ticket_id));
    }

    /// Report the channel as gone when a notice is sent, although it still resolves.
    pub async fn vanish_on_send(&self, ticket_id: &str) {
        self.vanishing.lock().await.insert(TicketId::from(ticket_id));
    }

    /// Delay channel resolution for a ticket.
    pub async fn delay_resolve(&self, ticket_id: &str, delay: Duration) {
        self.delays.lock().await.insert(TicketId::from(ticket_id), delay);
    }

    /// All notices sent so far.
    pub async fn sent_notices(&self) -> Vec<SentNotice> {
        self.sent.lock().await.clone()
    }

    /// Notices of one kind sent to one ticket.
    pub async fn notices_for(&self, ticket_id: &str, kind: NoticeKind) -> Vec<SentNotice> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|s| s.ticket_id.as_str() == ticket_id && s.notice.kind == kind)
            .cloned()
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Every `limit` passed to `recent_non_bot_messages`.
    pub async fn requested_limits(&self) -> Vec<usize> {
        self.requested_limits.lock().await.clone()
    }
}

#[async_trait]
impl ChannelGateway for MockChannelGateway {
    async fn resolve_channel(&self, ticket_id: &TicketId) -> Result<Option<Channel>, TicketsError> {
        let delay = self.delays.lock().await.get(ticket_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.channels.lock().await.get(ticket_id).cloned())
    }

    async fn recent_non_bot_messages(
        &self,
        channel: &Channel,
        limit: usize,
    ) -> Result<Vec<RecentMessage>, TicketsError> {
        let ticket_id = TicketId::from(channel.id.as_str());
        self.requested_limits.lock().await.push(limit);
        if self.failing_reads.lock().await.contains(&ticket_id) {
            return Err(TicketsError::Notify {
                ticket_id,
                message: "mock read failure".into(),
                source: None,
            });
        }
        Ok(self
            .messages
            .lock()
            .await
            .get(&ticket_id)
            .map(|m| m.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn send_notice(
        &self,
        channel: &Channel,
        notice: Notice,
    ) -> Result<MessageHandle, TicketsError> {
        let ticket_id = TicketId::from(channel.id.as_str());
        if self.vanishing.lock().await.contains(&ticket_id) {
            return Err(TicketsError::ChannelNotFound { ticket_id });
        }
        if self.failing_sends.lock().await.contains(&ticket_id) {
            return Err(TicketsError::Notify {
                ticket_id,
                message: "mock send failure".into(),
                source: None,
            });
        }
        let n = self.next_message.fetch_add(1, Ordering::SeqCst);
        let handle = MessageHandle {
            channel_id: channel.id.clone(),
            message_id: format!("mock-msg-{n}"),
        };
        self.sent.lock().await.push(SentNotice {
            ticket_id,
            notice,
            handle: handle.clone(),
        });
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickets_core::MentionTarget;

    fn notice() -> Notice {
        Notice {
            kind: NoticeKind::Inactive,
            title: "title".into(),
            description: "body".into(),
            colour: "#009999".into(),
            footer: None,
            mentions: MentionTarget::Nobody,
            with_close_action: true,
        }
    }

    #[tokio::test]
    async fn resolves_only_registered_channels() {
        let gateway = MockChannelGateway::new();
        gateway.add_channel("t1", "g1").await;

        assert!(gateway.resolve_channel(&TicketId::from("t1")).await.unwrap().is_some());
        assert!(gateway.resolve_channel(&TicketId::from("t2")).await.unwrap().is_none());

        gateway.remove_channel("t1").await;
        assert!(gateway.resolve_channel(&TicketId::from("t1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_messages_respect_limit() {
        let gateway = MockChannelGateway::new();
        gateway.add_channel("t1", "g1").await;
        gateway.set_recent_authors("t1", &["a", "b", "c"]).await;
        let channel = gateway.resolve_channel(&TicketId::from("t1")).await.unwrap().unwrap();

        let recent = gateway.recent_non_bot_messages(&channel, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].author_id, UserId::from("a"));
        assert_eq!(gateway.requested_limits().await, vec![2]);
    }

    #[tokio::test]
    async fn send_captures_and_failures_are_injected() {
        let gateway = MockChannelGateway::new();
        gateway.add_channel("t1", "g1").await;
        let channel = gateway.resolve_channel(&TicketId::from("t1")).await.unwrap().unwrap();

        let handle = gateway.send_notice(&channel, notice()).await.unwrap();
        assert!(handle.message_id.starts_with("mock-msg-"));
        assert_eq!(gateway.sent_count().await, 1);

        gateway.fail_sends_for("t1").await;
        assert!(gateway.send_notice(&channel, notice()).await.is_err());
        assert_eq!(gateway.sent_count().await, 1);
    }

    #[tokio::test]
    async fn vanish_on_send_reports_channel_not_found() {
        let gateway = MockChannelGateway::new();
        gateway.add_channel("t1", "g1").await;
        gateway.vanish_on_send("t1").await;
        let channel = gateway.resolve_channel(&TicketId::from("t1")).await.unwrap().unwrap();

        let err = gateway.send_notice(&channel, notice()).await.unwrap_err();
        assert!(err.is_channel_not_found());
    }
}
