// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for test tickets and guild settings.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tickets_core::{Category, CategoryId, GuildSettings, RoleId, Ticket, TicketId, UserId};

/// A fixed reference instant so tests are independent of the wall clock.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Guild settings with the given thresholds and default presentation.
pub fn guild(id: &str, stale_after: Option<TimeDelta>, auto_close: Option<TimeDelta>) -> GuildSettings {
    GuildSettings {
        stale_after,
        auto_close,
        footer: Some("Support".to_string()),
        ..GuildSettings::new(id)
    }
}

/// An open ticket owned by `owner`, created at `created_at`, in a category
/// that pings `ping_roles`.
pub fn ticket(
    id: &str,
    guild_id: &str,
    owner: &str,
    created_at: DateTime<Utc>,
    last_message_at: Option<DateTime<Utc>>,
    ping_roles: &[&str],
) -> Ticket {
    Ticket {
        id: TicketId::from(id),
        guild_id: guild_id.into(),
        created_at,
        last_message_at,
        open: true,
        category: Category {
            id: CategoryId::from("support"),
            ping_roles: ping_roles.iter().map(|r| RoleId::from(*r)).collect(),
        },
        created_by_id: UserId::from(owner),
    }
}

/// An open ticket whose last message was `idle` before `now`.
pub fn idle_ticket(id: &str, guild_id: &str, now: DateTime<Utc>, idle: TimeDelta) -> Ticket {
    ticket(
        id,
        guild_id,
        "owner",
        now - idle - TimeDelta::hours(1),
        Some(now - idle),
        &["support-role"],
    )
}
