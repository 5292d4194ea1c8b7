// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row representation of a stale record and conversions to the domain type.
//!
//! Timestamps are stored as RFC 3339 text with millisecond precision so they
//! sort lexicographically. The last notice handle is stored as JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use tickets_core::{MessageHandle, StaleRecord, TicketId, TicketsError, UserId};

/// A `stale_records` row as read from or written to SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleRecordRow {
    pub ticket_id: String,
    pub stale_since: String,
    pub close_at: Option<String>,
    pub closed_by: Option<String>,
    pub reason: String,
    pub last_notice: Option<String>,
    pub messages_since_stale: i64,
}

/// Column list shared by every SELECT/RETURNING clause, in [`StaleRecordRow::from_row`] order.
pub(crate) const COLUMNS: &str =
    "ticket_id, stale_since, close_at, closed_by, reason, last_notice, messages_since_stale";

impl StaleRecordRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            ticket_id: row.get(0)?,
            stale_since: row.get(1)?,
            close_at: row.get(2)?,
            closed_by: row.get(3)?,
            reason: row.get(4)?,
            last_notice: row.get(5)?,
            messages_since_stale: row.get(6)?,
        })
    }
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TicketsError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(TicketsError::storage)
}

impl TryFrom<&StaleRecord> for StaleRecordRow {
    type Error = TicketsError;

    fn try_from(record: &StaleRecord) -> Result<Self, Self::Error> {
        let last_notice = record
            .last_notice
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(TicketsError::storage)?;
        Ok(Self {
            ticket_id: record.ticket_id.0.clone(),
            stale_since: format_timestamp(record.stale_since),
            close_at: record.close_at.map(format_timestamp),
            closed_by: record.closed_by.as_ref().map(|u| u.0.clone()),
            reason: record.reason.clone(),
            last_notice,
            messages_since_stale: i64::from(record.messages_since_stale),
        })
    }
}

impl TryFrom<StaleRecordRow> for StaleRecord {
    type Error = TicketsError;

    fn try_from(row: StaleRecordRow) -> Result<Self, Self::Error> {
        let last_notice = row
            .last_notice
            .as_deref()
            .map(serde_json::from_str::<MessageHandle>)
            .transpose()
            .map_err(TicketsError::storage)?;
        let messages_since_stale = u32::try_from(row.messages_since_stale).map_err(|_| {
            TicketsError::Internal(format!(
                "negative or oversized message count {} for ticket {}",
                row.messages_since_stale, row.ticket_id
            ))
        })?;
        Ok(StaleRecord {
            stale_since: parse_timestamp(&row.stale_since)?,
            close_at: row.close_at.as_deref().map(parse_timestamp).transpose()?,
            closed_by: row.closed_by.map(UserId),
            reason: row.reason,
            last_notice,
            messages_since_stale,
            ticket_id: TicketId(row.ticket_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use tickets_core::REASON_INACTIVITY;

    #[test]
    fn row_conversion_preserves_fields() {
        let since = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let mut record = StaleRecord::new(
            TicketId::from("t1"),
            since,
            Some(TimeDelta::hours(1)),
            REASON_INACTIVITY,
        );
        record.closed_by = Some(UserId::from("u9"));
        record.messages_since_stale = 3;
        record.last_notice = Some(MessageHandle {
            channel_id: "t1".into(),
            message_id: "m1".into(),
        });

        let row = StaleRecordRow::try_from(&record).unwrap();
        assert_eq!(row.stale_since, "2026-03-01T10:00:00.000Z");
        assert_eq!(row.close_at.as_deref(), Some("2026-03-01T11:00:00.000Z"));

        let back = StaleRecord::try_from(row).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn malformed_timestamp_is_a_storage_error() {
        let row = StaleRecordRow {
            ticket_id: "t1".into(),
            stale_since: "yesterday".into(),
            close_at: None,
            closed_by: None,
            reason: REASON_INACTIVITY.into(),
            last_notice: None,
            messages_since_stale: 0,
        };
        let err = StaleRecord::try_from(row).unwrap_err();
        assert!(matches!(err, TicketsError::Storage { .. }));
    }
}
