// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ping resolution for the inactivity notice.
//!
//! If staff have taken part in the recent conversation, the ticket owner is
//! the one who owes a reply and gets mentioned. If only non-staff have spoken,
//! the category's support roles are mentioned instead. An empty window
//! mentions nobody.

use std::collections::HashSet;

use tickets_core::{
    GuildId, MentionTarget, RecentMessage, RoleId, StaffClassifier, Ticket, TicketsError,
};

/// Decide who the inactivity notice should mention.
///
/// `recent` holds the latest non-bot messages, newest first. Each distinct
/// author is checked at most once and the lookup stops at the first staff
/// member found.
pub async fn resolve_mentions(
    staff: &dyn StaffClassifier,
    guild_id: &GuildId,
    ticket: &Ticket,
    recent: &[RecentMessage],
) -> Result<MentionTarget, TicketsError> {
    if recent.is_empty() {
        return Ok(MentionTarget::Nobody);
    }

    let mut checked = HashSet::new();
    for message in recent {
        if !checked.insert(&message.author_id) {
            continue;
        }
        if staff.is_staff(guild_id, &message.author_id).await? {
            return Ok(MentionTarget::User(ticket.created_by_id.clone()));
        }
    }

    Ok(MentionTarget::Roles(dedup_roles(&ticket.category.ping_roles)))
}

fn dedup_roles(roles: &[RoleId]) -> Vec<RoleId> {
    let mut seen = HashSet::new();
    roles
        .iter()
        .filter(|role| seen.insert(*role))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickets_core::UserId;
    use tickets_test_utils::{fixtures, MockStaffClassifier};

    fn messages(authors: &[&str]) -> Vec<RecentMessage> {
        authors
            .iter()
            .map(|a| RecentMessage {
                author_id: UserId::from(*a),
            })
            .collect()
    }

    fn support_ticket() -> Ticket {
        fixtures::ticket(
            "t1",
            "g1",
            "owner",
            fixtures::epoch(),
            None,
            &["support", "escalation", "support"],
        )
    }

    #[tokio::test]
    async fn staff_participation_pings_owner() {
        let staff = MockStaffClassifier::new();
        staff.add_staff("g1", "agent").await;

        let target = resolve_mentions(
            &staff,
            &GuildId::from("g1"),
            &support_ticket(),
            &messages(&["owner", "agent"]),
        )
        .await
        .unwrap();
        assert_eq!(target, MentionTarget::User(UserId::from("owner")));
    }

    #[tokio::test]
    async fn no_staff_pings_category_roles_once_each() {
        let staff = MockStaffClassifier::new();
        let target = resolve_mentions(
            &staff,
            &GuildId::from("g1"),
            &support_ticket(),
            &messages(&["owner", "owner", "friend"]),
        )
        .await
        .unwrap();
        assert_eq!(
            target,
            MentionTarget::Roles(vec![RoleId::from("support"), RoleId::from("escalation")])
        );
        // "owner" appears twice but is only looked up once.
        assert_eq!(staff.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_window_pings_nobody() {
        let staff = MockStaffClassifier::new();
        let target = resolve_mentions(&staff, &GuildId::from("g1"), &support_ticket(), &[])
            .await
            .unwrap();
        assert_eq!(target, MentionTarget::Nobody);
        assert_eq!(staff.call_count(), 0);
    }

    #[tokio::test]
    async fn staff_lookup_is_scoped_to_guild() {
        let staff = MockStaffClassifier::new();
        staff.add_staff("other-guild", "agent").await;
        let target = resolve_mentions(
            &staff,
            &GuildId::from("g1"),
            &support_ticket(),
            &messages(&["agent"]),
        )
        .await
        .unwrap();
        assert!(matches!(target, MentionTarget::Roles(_)));
    }

    #[tokio::test]
    async fn classifier_failure_propagates() {
        let staff = MockStaffClassifier::new();
        staff.fail_all();
        let err = resolve_mentions(
            &staff,
            &GuildId::from("g1"),
            &support_ticket(),
            &messages(&["owner"]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TicketsError::Classify { .. }));
    }
}
