// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staff role lookup.

use async_trait::async_trait;

use crate::error::TicketsError;
use crate::types::{GuildId, UserId};

/// Answers whether a user holds a staff role in a guild.
#[async_trait]
pub trait StaffClassifier: Send + Sync + 'static {
    async fn is_staff(&self, guild_id: &GuildId, user_id: &UserId) -> Result<bool, TicketsError>;
}
