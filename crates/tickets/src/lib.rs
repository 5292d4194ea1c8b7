// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring for embedding the stale ticket sweep in a bot process.
//!
//! A host bot supplies its own collaborators (ticket source, chat gateway,
//! staff lookup, closer) and calls [`start_stale_sweep`]:
//!
//! ```no_run
//! # async fn host(collaborators: tickets_stale::Collaborators) -> Result<(), tickets_core::TicketsError> {
//! let config = tickets_config::load_and_validate().map_err(|errors| {
//!     tickets_config::render_errors(&errors);
//!     tickets_core::TicketsError::Config("invalid configuration".into())
//! })?;
//! tickets::init_tracing(&config.daemon.log_level);
//!
//! let shutdown = tickets::shutdown::install_signal_handler();
//! let runtime = tickets::start_stale_sweep(&config, collaborators, &shutdown).await?;
//!
//! // Forward non-bot messages so stale tickets can be reactivated.
//! // runtime.tracker().note_message(&ticket_id).await?;
//!
//! shutdown.cancelled().await;
//! runtime.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod runtime;
pub mod shutdown;

pub use runtime::{init_tracing, open_store, start_stale_sweep, StaleRuntime};
