// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transport used to inspect ticket channels and post notices.

use async_trait::async_trait;

use crate::error::TicketsError;
use crate::types::{Channel, MessageHandle, Notice, RecentMessage, TicketId};

/// Gateway to the messaging platform hosting ticket channels.
#[async_trait]
pub trait ChannelGateway: Send + Sync + 'static {
    /// Resolve the channel backing a ticket. `Ok(None)` means the channel is gone.
    async fn resolve_channel(&self, ticket_id: &TicketId) -> Result<Option<Channel>, TicketsError>;

    /// The most recent messages in the channel not authored by the bot, newest first.
    async fn recent_non_bot_messages(
        &self,
        channel: &Channel,
        limit: usize,
    ) -> Result<Vec<RecentMessage>, TicketsError>;

    /// Post a notice into the channel and return a handle to the sent message.
    async fn send_notice(
        &self,
        channel: &Channel,
        notice: Notice,
    ) -> Result<MessageHandle, TicketsError>;
}
