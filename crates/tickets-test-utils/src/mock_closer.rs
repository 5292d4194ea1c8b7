// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock ticket closer.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tickets_core::{CloseRequest, TicketCloser, TicketId, TicketsError};

/// Captures close requests instead of closing anything.
#[derive(Default)]
pub struct MockCloser {
    closed: Mutex<Vec<(TicketId, CloseRequest)>>,
    failing: Mutex<HashSet<TicketId>>,
}

impl MockCloser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make closing this ticket fail.
    pub async fn fail_for(&self, ticket_id: &str) {
        self.failing.lock().await.insert(TicketId::from(ticket_id));
    }

    /// Stop failing for this ticket.
    pub async fn recover(&self, ticket_id: &str) {
        self.failing.lock().await.remove(&TicketId::from(ticket_id));
    }

    pub async fn closed(&self) -> Vec<(TicketId, CloseRequest)> {
        self.closed.lock().await.clone()
    }

    pub async fn close_count(&self) -> usize {
        self.closed.lock().await.len()
    }
}

#[async_trait]
impl TicketCloser for MockCloser {
    async fn close_ticket(
        &self,
        ticket_id: &TicketId,
        request: CloseRequest,
    ) -> Result<(), TicketsError> {
        if self.failing.lock().await.contains(ticket_id) {
            return Err(TicketsError::Close {
                ticket_id: ticket_id.clone(),
                message: "mock close failure".into(),
                source: None,
            });
        }
        self.closed.lock().await.push((ticket_id.clone(), request));
        Ok(())
    }
}
