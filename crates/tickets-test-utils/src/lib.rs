// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the ticket staleness sweep.
//!
//! Provides deterministic in-memory implementations of every external
//! collaborator, with failure injection and captured side effects.
//!
//! # Components
//!
//! - [`MockTicketSource`] - Configurable guild/ticket snapshot
//! - [`MockChannelGateway`] - Channels, recent messages, captured notices
//! - [`MockStaffClassifier`] - Staff membership per guild
//! - [`MockCloser`] - Captured close requests
//! - [`fixtures`] - Builders for tickets and guild settings

pub mod fixtures;
pub mod mock_channel;
pub mod mock_closer;
pub mod mock_source;
pub mod mock_staff;

pub use mock_channel::{MockChannelGateway, SentNotice};
pub use mock_closer::MockCloser;
pub use mock_source::MockTicketSource;
pub use mock_staff::MockStaffClassifier;
