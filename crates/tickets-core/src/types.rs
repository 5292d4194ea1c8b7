// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the collaborator traits and the sweep engine.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a ticket. Maps 1:1 to the ticket's channel.
    TicketId
);
string_id!(
    /// Identifier of a guild (server).
    GuildId
);
string_id!(
    /// Identifier of a user.
    UserId
);
string_id!(
    /// Identifier of a role.
    RoleId
);
string_id!(
    /// Identifier of a ticket category.
    CategoryId
);

/// Reference to a message sent by the transport, kept for later edits or deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHandle {
    pub channel_id: String,
    pub message_id: String,
}

/// Per-guild staleness settings and presentation data.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildSettings {
    pub guild_id: GuildId,
    /// Inactivity threshold. `None` or zero disables staleness for the guild.
    pub stale_after: Option<TimeDelta>,
    /// Time from becoming stale to auto-close. `None` warns but never closes.
    pub auto_close: Option<TimeDelta>,
    pub primary_colour: String,
    pub footer: Option<String>,
    pub locale: String,
}

impl GuildSettings {
    /// Settings with staleness disabled and default presentation.
    pub fn new(guild_id: impl Into<GuildId>) -> Self {
        Self {
            guild_id: guild_id.into(),
            stale_after: None,
            auto_close: None,
            primary_colour: "#009999".to_string(),
            footer: None,
            locale: "en-GB".to_string(),
        }
    }

    /// Returns the effective staleness threshold, if staleness can be evaluated
    /// at the given sweep resolution.
    ///
    /// Thresholds shorter than the sweep interval cannot be observed reliably
    /// and disable staleness for the guild.
    pub fn stale_threshold(&self, interval: TimeDelta) -> Option<TimeDelta> {
        self.stale_after
            .filter(|after| *after > TimeDelta::zero() && *after >= interval)
    }
}

/// A ticket category. Carries the roles to mention when no staff has engaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub ping_roles: Vec<RoleId>,
}

/// An open support ticket as supplied by the ticket source.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: TicketId,
    pub guild_id: GuildId,
    pub created_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub open: bool,
    pub category: Category,
    pub created_by_id: UserId,
}

impl Ticket {
    /// The moment of last activity: the last message, or creation if none.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message_at.unwrap_or(self.created_at)
    }

    /// How long the ticket has been idle at `now`.
    pub fn idle_for(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.last_activity()
    }
}

/// One guild's settings together with its open tickets.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildTickets {
    pub guild: GuildSettings,
    pub tickets: Vec<Ticket>,
}

/// A resolved ticket channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub guild_id: GuildId,
}

/// A recent non-bot message, reduced to what the ping policy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentMessage {
    pub author_id: UserId,
}

/// Who a notice should mention.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MentionTarget {
    /// No mention.
    #[default]
    Nobody,
    /// Mention a single user (the ticket owner).
    User(UserId),
    /// Mention a set of roles (the category's support roles).
    Roles(Vec<RoleId>),
}

impl MentionTarget {
    pub fn is_empty(&self) -> bool {
        match self {
            MentionTarget::Nobody => true,
            MentionTarget::User(_) => false,
            MentionTarget::Roles(roles) => roles.is_empty(),
        }
    }

    /// Render as message content using chat mention syntax.
    pub fn to_content(&self) -> String {
        match self {
            MentionTarget::Nobody => String::new(),
            MentionTarget::User(user) => format!("<@{user}>"),
            MentionTarget::Roles(roles) => roles
                .iter()
                .map(|r| format!("<@&{r}>"))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Which notice is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum NoticeKind {
    /// The ticket has just been marked stale.
    Inactive,
    /// The ticket will be closed soon.
    ClosingSoon,
}

/// A notice to deliver into a ticket channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    pub colour: String,
    pub footer: Option<String>,
    pub mentions: MentionTarget,
    /// Attach a "close" action control to the message.
    pub with_close_action: bool,
}

/// Context handed to the closer when a ticket is finally closed.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseRequest {
    pub reason: String,
    pub closed_by: Option<UserId>,
    pub record: Option<StaleRecord>,
}

/// Reason recorded when a ticket goes stale through inactivity.
pub const REASON_INACTIVITY: &str = "inactivity";

/// Reason used when a ticket is closed because its channel disappeared.
pub const REASON_CHANNEL_DELETED: &str = "channel deleted";

/// Transient tracking data for a ticket in the stale phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleRecord {
    pub ticket_id: TicketId,
    pub stale_since: DateTime<Utc>,
    /// When the ticket must be auto-closed. Never earlier than `stale_since`.
    pub close_at: Option<DateTime<Utc>>,
    pub closed_by: Option<UserId>,
    pub reason: String,
    pub last_notice: Option<MessageHandle>,
    pub messages_since_stale: u32,
}

impl StaleRecord {
    /// Start tracking a ticket that became stale at `stale_since`.
    ///
    /// A non-positive `auto_close` is treated as absent.
    pub fn new(
        ticket_id: TicketId,
        stale_since: DateTime<Utc>,
        auto_close: Option<TimeDelta>,
        reason: impl Into<String>,
    ) -> Self {
        let close_at = auto_close
            .filter(|d| *d > TimeDelta::zero())
            .map(|d| stale_since + d);
        Self {
            ticket_id,
            stale_since,
            close_at,
            closed_by: None,
            reason: reason.into(),
            last_notice: None,
            messages_since_stale: 0,
        }
    }

    /// Midpoint of the stale-to-close window, when auto-close is configured.
    pub fn halfway(&self) -> Option<DateTime<Utc>> {
        self.close_at
            .map(|close_at| close_at - (close_at - self.stale_since) / 2)
    }

    /// Whether the record is due for closing at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.close_at.is_some_and(|close_at| now >= close_at)
    }
}
