// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the ticket staleness sweep.

use thiserror::Error;

use crate::types::TicketId;

/// The primary error type used across collaborator traits and the sweep engine.
#[derive(Debug, Error)]
pub enum TicketsError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Stale record store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The guild/ticket snapshot could not be fetched. Aborts the whole sweep.
    #[error("fetch failed: {message}")]
    Fetch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A notice could not be delivered, or recent messages could not be read.
    #[error("notify failed for ticket {ticket_id}: {message}")]
    Notify {
        ticket_id: TicketId,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Staff role lookup failed.
    #[error("staff classification failed: {message}")]
    Classify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The external closer reported a failure.
    #[error("close failed for ticket {ticket_id}: {message}")]
    Close {
        ticket_id: TicketId,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The ticket's backing channel no longer exists.
    ///
    /// Not reported upward: the sweep treats it as a terminal signal for the ticket.
    #[error("channel for ticket {ticket_id} not found")]
    ChannelNotFound { ticket_id: TicketId },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TicketsError {
    /// Returns `true` if this error means the ticket's channel is gone.
    pub fn is_channel_not_found(&self) -> bool {
        matches!(self, TicketsError::ChannelNotFound { .. })
    }

    /// Wrap any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TicketsError::Storage {
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_not_found_is_detected() {
        let err = TicketsError::ChannelNotFound {
            ticket_id: TicketId::from("123"),
        };
        assert!(err.is_channel_not_found());
        assert_eq!(err.to_string(), "channel for ticket 123 not found");

        let other = TicketsError::Internal("boom".into());
        assert!(!other.is_channel_not_found());
    }

    #[test]
    fn storage_helper_boxes_source() {
        let err = TicketsError::storage(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn close_error_mentions_ticket() {
        let err = TicketsError::Close {
            ticket_id: TicketId::from("42"),
            message: "archive unavailable".into(),
            source: None,
        };
        assert_eq!(
            err.to_string(),
            "close failed for ticket 42: archive unavailable"
        );
    }
}
