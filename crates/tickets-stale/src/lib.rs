// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background staleness sweep for support tickets.
//!
//! A [`ScheduledSweep`] fires a [`StaleSweeper`] at a fixed interval. Each
//! sweep walks every open ticket in guilds with staleness enabled and moves
//! it at most one step along Active -> Stale -> Warned -> Closed, using a
//! [`StaleStore`](tickets_core::StaleStore) as the only shared state.
//! [`StaleTracker`] feeds message activity back into that store.

pub mod engine;
pub mod notice;
pub mod policy;
pub mod scheduler;
pub mod store;
pub mod tracker;

pub use engine::{Collaborators, StaleSweeper, SweepReport, SweepSettings, TicketOutcome};
pub use scheduler::ScheduledSweep;
pub use store::MemoryStaleStore;
pub use tracker::{ActivityOutcome, StaleTracker};
