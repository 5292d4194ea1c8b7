// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the ticket staleness sweep.
//!
//! This crate provides the error type, the shared data model, and the trait
//! definitions for every collaborator the sweep talks to. The ticket source,
//! chat transport, staff lookup and closer live outside this workspace and
//! plug in by implementing the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TicketsError;
pub use types::{
    Category, CategoryId, Channel, CloseRequest, GuildId, GuildSettings, GuildTickets,
    MentionTarget, MessageHandle, Notice, NoticeKind, RecentMessage, RoleId, StaleRecord, Ticket,
    TicketId, UserId, REASON_CHANNEL_DELETED, REASON_INACTIVITY,
};

// Re-export all collaborator traits at crate root.
pub use traits::{ChannelGateway, StaffClassifier, StaleStore, TicketCloser, TicketSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_error_has_all_variants() {
        let _config = TicketsError::Config("test".into());
        let _storage = TicketsError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _fetch = TicketsError::Fetch {
            message: "test".into(),
            source: None,
        };
        let _notify = TicketsError::Notify {
            ticket_id: TicketId::from("t"),
            message: "test".into(),
            source: None,
        };
        let _classify = TicketsError::Classify {
            message: "test".into(),
            source: None,
        };
        let _close = TicketsError::Close {
            ticket_id: TicketId::from("t"),
            message: "test".into(),
            source: None,
        };
        let _missing = TicketsError::ChannelNotFound {
            ticket_id: TicketId::from("t"),
        };
        let _timeout = TicketsError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = TicketsError::Internal("test".into());
    }

    #[test]
    fn all_traits_are_exported() {
        // Compiles only if every collaborator trait is reachable from the crate root.
        fn _assert_source<T: TicketSource>() {}
        fn _assert_gateway<T: ChannelGateway>() {}
        fn _assert_staff<T: StaffClassifier>() {}
        fn _assert_closer<T: TicketCloser>() {}
        fn _assert_store<T: StaleStore>() {}
    }
}
