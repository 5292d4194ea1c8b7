// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notice construction for the two messages the sweep sends.

use chrono::{DateTime, Utc};

use tickets_core::{GuildSettings, MentionTarget, Notice, NoticeKind};

const INACTIVE_TITLE: &str = "This ticket is inactive";
const CLOSING_SOON_TITLE: &str = "This ticket will be closed soon";

/// Render an instant as a relative chat timestamp.
fn relative_timestamp(at: DateTime<Utc>) -> String {
    format!("<t:{}:R>", at.timestamp())
}

/// The notice sent when a ticket is marked stale.
///
/// Carries the close action so participants can close the ticket themselves.
pub fn inactive(
    guild: &GuildSettings,
    last_activity: DateTime<Utc>,
    mentions: MentionTarget,
) -> Notice {
    Notice {
        kind: NoticeKind::Inactive,
        title: INACTIVE_TITLE.to_string(),
        description: format!(
            "There has been no activity in this ticket since {}. \
             Send a message to keep it open, or close it if you no longer need help.",
            relative_timestamp(last_activity)
        ),
        colour: guild.primary_colour.clone(),
        footer: guild.footer.clone(),
        mentions,
        with_close_action: true,
    }
}

/// The one-time warning sent halfway to auto-close.
///
/// `closes_at` is the time advertised to participants.
pub fn closing_soon(guild: &GuildSettings, closes_at: DateTime<Utc>) -> Notice {
    Notice {
        kind: NoticeKind::ClosingSoon,
        title: CLOSING_SOON_TITLE.to_string(),
        description: format!(
            "This ticket will be closed due to inactivity {}.",
            relative_timestamp(closes_at)
        ),
        colour: guild.primary_colour.clone(),
        footer: None,
        mentions: MentionTarget::Nobody,
        with_close_action: false,
    }
}
