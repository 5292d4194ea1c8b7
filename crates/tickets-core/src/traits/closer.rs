// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Final ticket closing.

use async_trait::async_trait;

use crate::error::TicketsError;
use crate::types::{CloseRequest, TicketId};

/// Permanently closes a ticket (archival, channel removal, bookkeeping).
#[async_trait]
pub trait TicketCloser: Send + Sync + 'static {
    async fn close_ticket(
        &self,
        ticket_id: &TicketId,
        request: CloseRequest,
    ) -> Result<(), TicketsError>;
}
