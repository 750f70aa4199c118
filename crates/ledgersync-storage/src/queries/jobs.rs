// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sync-job queue operations for crash-safe trigger processing.
//!
//! Inbound trigger events are enqueued here and consumed by the serve
//! loop. A job that fails is retried up to `max_attempts` times, which
//! gives the orchestrator the at-least-once delivery the idempotent
//! transaction writes are designed for.

use ledgersync_core::SyncError;
use ledgersync_core::types::SyncJob;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Enqueue a new trigger payload. Returns the auto-generated job ID.
pub async fn enqueue(db: &Database, payload: &str) -> Result<i64, SyncError> {
    let payload = payload.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute("INSERT INTO sync_jobs (payload) VALUES (?1)", params![payload])?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Dequeue the next pending job.
///
/// Atomically selects the oldest pending entry and marks it as
/// "processing" with a 5-minute lock timeout. A "processing" entry whose
/// lock has expired counts as pending again, so a job orphaned by a
/// crash mid-run is reclaimed instead of stranded. Returns `None` if
/// the queue is empty.
pub async fn dequeue(db: &Database) -> Result<Option<SyncJob>, SyncError> {
    db.connection()
        .call(move |conn| {
            // Transaction to atomically find + update the next pending entry.
            let tx = conn.transaction()?;

            let result = {
                let mut stmt = tx.prepare(
                    "SELECT id, payload, status, attempts, max_attempts,
                            created_at, updated_at, locked_until
                     FROM sync_jobs
                     WHERE status = 'pending'
                        OR (status = 'processing'
                            AND locked_until < strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                     ORDER BY id ASC
                     LIMIT 1",
                )?;
                stmt.query_row([], |row| {
                    Ok(SyncJob {
                        id: row.get(0)?,
                        payload: row.get(1)?,
                        status: row.get(2)?,
                        attempts: row.get(3)?,
                        max_attempts: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                        locked_until: row.get(7)?,
                    })
                })
            };

            match result {
                Ok(job) => {
                    tx.execute(
                        "UPDATE sync_jobs SET status = 'processing',
                         locked_until = strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '+5 minutes'),
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE id = ?1",
                        params![job.id],
                    )?;
                    tx.commit()?;

                    Ok(Some(SyncJob {
                        status: "processing".to_string(),
                        ..job
                    }))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    tx.commit()?;
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Acknowledge successful processing of a job, marking it "completed".
pub async fn ack(db: &Database, id: i64) -> Result<(), SyncError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE sync_jobs SET status = 'completed',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Mark a job as failed.
///
/// Increments attempts. At `max_attempts` the job goes to "failed";
/// otherwise it returns to "pending" for retry and the lock is cleared.
pub async fn fail(db: &Database, id: i64) -> Result<(), SyncError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let (attempts, max_attempts): (i32, i32) = conn.query_row(
                "SELECT attempts, max_attempts FROM sync_jobs WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            let new_attempts = attempts + 1;
            let status = if new_attempts >= max_attempts {
                "failed"
            } else {
                "pending"
            };
            conn.execute(
                "UPDATE sync_jobs SET status = ?1, attempts = ?2,
                 locked_until = NULL,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3",
                params![status, new_attempts, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
