// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idempotent transaction persistence.
//!
//! `upsert_many` is the write primitive the batch processor drives: one
//! chunk per call, keyed by `internal_id`, with conflicting (duplicate)
//! keys silently skipped rather than errored or overwritten.

use ledgersync_core::SyncError;
use ledgersync_core::types::{TeamId, Transaction};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Insert one chunk of transactions, ignoring rows whose `internal_id`
/// already exists. Returns the number of rows actually inserted.
///
/// The chunk is written in a single SQL transaction: a mid-chunk failure
/// inserts nothing from this chunk, and previously written chunks are
/// never rolled back.
pub async fn upsert_many(db: &Database, batch: &[Transaction]) -> Result<usize, SyncError> {
    let batch: Vec<Transaction> = batch.to_vec();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            let mut inserted = 0usize;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO transactions
                     (internal_id, team_id, bank_account_id, amount, currency, date,
                      description, method, category, status)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                     ON CONFLICT(internal_id) DO NOTHING",
                )?;
                for t in &batch {
                    inserted += stmt.execute(params![
                        t.internal_id,
                        t.team_id.0,
                        t.bank_account_id,
                        t.amount,
                        t.currency,
                        t.date.to_string(),
                        t.description,
                        t.method,
                        t.category,
                        t.status.to_string(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(map_tr_err)
}

/// Count stored transactions for a team.
pub async fn count_for_team(db: &Database, team_id: &TeamId) -> Result<i64, SyncError> {
    let team = team_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM transactions WHERE team_id = ?1",
                params![team],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// List all stored internal ids for a team, sorted.
pub async fn internal_ids_for_team(
    db: &Database,
    team_id: &TeamId,
) -> Result<Vec<String>, SyncError> {
    let team = team_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT internal_id FROM transactions WHERE team_id = ?1 ORDER BY internal_id",
            )?;
            let rows = stmt.query_map(params![team], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::accounts::create_account;
    use crate::queries::connections::create_connection;
    use chrono::NaiveDate;
    use ledgersync_core::types::{
        AccountType, BankAccount, BankConnection, TransactionStatus,
    };
    use tempfile::tempdir;

    async fn setup_db_with_account() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        create_connection(
            &db,
            &BankConnection {
                id: "conn-1".to_string(),
                provider: "plaid".to_string(),
                access_token: "token".to_string(),
                last_accessed: None,
            },
        )
        .await
        .unwrap();
        create_account(
            &db,
            &BankAccount {
                id: "acc-1".to_string(),
                team_id: TeamId::from("T1"),
                account_id: "ext-1".to_string(),
                account_type: AccountType::Depository,
                enabled: true,
                balance: None,
                bank_connection_id: "conn-1".to_string(),
            },
        )
        .await
        .unwrap();

        (db, dir)
    }

    fn txn(internal_id: &str) -> Transaction {
        Transaction {
            internal_id: internal_id.to_string(),
            team_id: TeamId::from("T1"),
            bank_account_id: "acc-1".to_string(),
            amount: -42.50,
            currency: "USD".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            description: "Coffee".to_string(),
            method: Some("card_purchase".to_string()),
            category: None,
            status: TransactionStatus::Posted,
        }
    }

    #[tokio::test]
    async fn upsert_inserts_and_counts() {
        let (db, _dir) = setup_db_with_account().await;
        let inserted = upsert_many(&db, &[txn("t1"), txn("t2"), txn("t3")]).await.unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(count_for_team(&db, &TeamId::from("T1")).await.unwrap(), 3);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_internal_id_is_skipped_not_updated() {
        let (db, _dir) = setup_db_with_account().await;
        upsert_many(&db, &[txn("t1")]).await.unwrap();

        // Same key, different amount: the conflict must be a no-op.
        let mut changed = txn("t1");
        changed.amount = 999.99;
        let inserted = upsert_many(&db, &[changed]).await.unwrap();
        assert_eq!(inserted, 0);

        let amount: f64 = db
            .connection()
            .call(|conn| -> Result<f64, rusqlite::Error> {
                conn.query_row(
                    "SELECT amount FROM transactions WHERE internal_id = 't1'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(amount, -42.50);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mixed_chunk_inserts_only_new_rows() {
        let (db, _dir) = setup_db_with_account().await;
        upsert_many(&db, &[txn("t1"), txn("t2")]).await.unwrap();

        let inserted = upsert_many(&db, &[txn("t2"), txn("t3")]).await.unwrap();
        assert_eq!(inserted, 1);

        let ids = internal_ids_for_team(&db, &TeamId::from("T1")).await.unwrap();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);

        db.close().await.unwrap();
    }
}
