// SPDX-FileCopyrightText: 2026 Tickets Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stale record CRUD operations.
//!
//! Conditional operations are single statements (`INSERT OR IGNORE`,
//! `DELETE ... RETURNING`, `UPDATE ... RETURNING`) so each is atomic on the
//! single writer thread.

use rusqlite::{params, OptionalExtension};
use tickets_core::{MessageHandle, StaleRecord, TicketId, TicketsError, UserId};

use crate::database::{map_tr_err, Database};
use crate::models::{StaleRecordRow, COLUMNS};

fn into_record(row: Option<StaleRecordRow>) -> Result<Option<StaleRecord>, TicketsError> {
    row.map(StaleRecord::try_from).transpose()
}

/// Get the record for a ticket.
pub async fn get_record(
    db: &Database,
    ticket_id: &TicketId,
) -> Result<Option<StaleRecord>, TicketsError> {
    let id = ticket_id.0.clone();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<StaleRecordRow>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM stale_records WHERE ticket_id = ?1"),
                params![id],
                StaleRecordRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;
    into_record(row)
}

/// Insert or overwrite the record for `record.ticket_id`.
pub async fn upsert_record(db: &Database, record: &StaleRecord) -> Result<(), TicketsError> {
    let row = StaleRecordRow::try_from(record)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO stale_records
                    (ticket_id, stale_since, close_at, closed_by, reason, last_notice, messages_since_stale)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(ticket_id) DO UPDATE SET
                    stale_since = excluded.stale_since,
                    close_at = excluded.close_at,
                    closed_by = excluded.closed_by,
                    reason = excluded.reason,
                    last_notice = excluded.last_notice,
                    messages_since_stale = excluded.messages_since_stale,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![
                    row.ticket_id,
                    row.stale_since,
                    row.close_at,
                    row.closed_by,
                    row.reason,
                    row.last_notice,
                    row.messages_since_stale,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert the record unless the ticket already has one. Returns whether a row was inserted.
pub async fn insert_record_if_absent(
    db: &Database,
    record: &StaleRecord,
) -> Result<bool, TicketsError> {
    let row = StaleRecordRow::try_from(record)?;
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO stale_records
                    (ticket_id, stale_since, close_at, closed_by, reason, last_notice, messages_since_stale)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.ticket_id,
                    row.stale_since,
                    row.close_at,
                    row.closed_by,
                    row.reason,
                    row.last_notice,
                    row.messages_since_stale,
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the record only if the ticket still has one.
pub async fn replace_record(db: &Database, record: &StaleRecord) -> Result<bool, TicketsError> {
    let row = StaleRecordRow::try_from(record)?;
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE stale_records SET
                    stale_since = ?2,
                    close_at = ?3,
                    closed_by = ?4,
                    reason = ?5,
                    last_notice = ?6,
                    messages_since_stale = ?7,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE ticket_id = ?1",
                params![
                    row.ticket_id,
                    row.stale_since,
                    row.close_at,
                    row.closed_by,
                    row.reason,
                    row.last_notice,
                    row.messages_since_stale,
                ],
            )?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete the record for a ticket. Returns whether a row existed.
pub async fn delete_record(db: &Database, ticket_id: &TicketId) -> Result<bool, TicketsError> {
    let id = ticket_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute(
                "DELETE FROM stale_records WHERE ticket_id = ?1",
                params![id],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete and return the record for a ticket in one statement.
pub async fn take_record(
    db: &Database,
    ticket_id: &TicketId,
) -> Result<Option<StaleRecord>, TicketsError> {
    let id = ticket_id.0.clone();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<StaleRecordRow>, rusqlite::Error> {
            conn.query_row(
                &format!("DELETE FROM stale_records WHERE ticket_id = ?1 RETURNING {COLUMNS}"),
                params![id],
                StaleRecordRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;
    into_record(row)
}

/// Increment the message counter and return the updated record.
pub async fn increment_messages(
    db: &Database,
    ticket_id: &TicketId,
) -> Result<Option<StaleRecord>, TicketsError> {
    let id = ticket_id.0.clone();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<StaleRecordRow>, rusqlite::Error> {
            conn.query_row(
                &format!(
                    "UPDATE stale_records SET
                        messages_since_stale = messages_since_stale + 1,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE ticket_id = ?1
                     RETURNING {COLUMNS}"
                ),
                params![id],
                StaleRecordRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;
    into_record(row)
}

/// Set only the `last_notice` column. Returns whether a row was updated.
pub async fn update_last_notice(
    db: &Database,
    ticket_id: &TicketId,
    handle: &MessageHandle,
) -> Result<bool, TicketsError> {
    let id = ticket_id.0.clone();
    let notice = serde_json::to_string(handle).map_err(TicketsError::storage)?;
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE stale_records SET
                    last_notice = ?2,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE ticket_id = ?1",
                params![id, notice],
            )?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Set only the `closed_by` column. Returns whether a row was updated.
pub async fn update_closed_by(
    db: &Database,
    ticket_id: &TicketId,
    user_id: &UserId,
) -> Result<bool, TicketsError> {
    let id = ticket_id.0.clone();
    let user = user_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE stale_records SET
                    closed_by = ?2,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE ticket_id = ?1",
                params![id, user],
            )?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Number of stored records.
pub async fn count_records(db: &Database) -> Result<usize, TicketsError> {
    let count = db
        .connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM stale_records", [], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)?;
    usize::try_from(count).map_err(|e| TicketsError::Internal(e.to_string()))
}

/// All records, oldest stale first.
pub async fn list_records(db: &Database) -> Result<Vec<StaleRecord>, TicketsError> {
    let rows = db
        .connection()
        .call(|conn| -> Result<Vec<StaleRecordRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM stale_records ORDER BY stale_since ASC, ticket_id ASC"
            ))?;
            let rows = stmt
                .query_map([], StaleRecordRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;
    rows.into_iter().map(StaleRecord::try_from).collect()
}
