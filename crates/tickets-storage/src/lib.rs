// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for stale ticket records.
//!
//! Stale tracking outlives process restarts: every record is written through
//! to a `stale_records` table so `stale_since` and `close_at` are recovered on
//! startup. All statements run on tokio-rusqlite's single background thread,
//! which serializes writers and makes each conditional statement atomic.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::SqliteStaleStore;
