// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! All traits are `Send + Sync + 'static` and use `#[async_trait]` so the
//! sweep engine can hold them as `Arc<dyn Trait>`.

pub mod channel;
pub mod closer;
pub mod source;
pub mod staff;
pub mod store;

pub use channel::ChannelGateway;
pub use closer::TicketCloser;
pub use source::TicketSource;
pub use staff::StaffClassifier;
pub use store::StaleStore;
