// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock staff classifier.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tickets_core::{GuildId, StaffClassifier, TicketsError, UserId};

/// Classifies users as staff from a fixed set of (guild, user) pairs.
#[derive(Default)]
pub struct MockStaffClassifier {
    staff: Mutex<HashSet<(GuildId, UserId)>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockStaffClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_staff(&self, guild_id: &str, user_id: &str) {
        self.staff
            .lock()
            .await
            .insert((GuildId::from(guild_id), UserId::from(user_id)));
    }

    /// Make every lookup fail.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StaffClassifier for MockStaffClassifier {
    async fn is_staff(&self, guild_id: &GuildId, user_id: &UserId) -> Result<bool, TicketsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TicketsError::Classify {
                message: "mock role lookup failure".into(),
                source: None,
            });
        }
        Ok(self
            .staff
            .lock()
            .await
            .contains(&(guild_id.clone(), user_id.clone())))
    }
}
