// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bank account operations: enumeration for sync runs and balance updates.

use std::str::FromStr;

use ledgersync_core::SyncError;
use ledgersync_core::types::{AccountType, BankAccount, BankConnection, EnabledAccount, TeamId};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Insert a new bank account.
pub async fn create_account(db: &Database, account: &BankAccount) -> Result<(), SyncError> {
    let a = account.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO bank_accounts
                 (id, team_id, account_id, account_type, enabled, balance, bank_connection_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    a.id,
                    a.team_id.0,
                    a.account_id,
                    a.account_type.to_string(),
                    a.enabled,
                    a.balance,
                    a.bank_connection_id
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Enumerate a team's enabled accounts joined with their connections.
///
/// Disabled accounts are excluded from sync entirely.
pub async fn list_enabled_with_connection(
    db: &Database,
    team_id: &TeamId,
) -> Result<Vec<EnabledAccount>, SyncError> {
    let team = team_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<EnabledAccount>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT a.id, a.team_id, a.account_id, a.account_type, a.enabled, a.balance,
                        a.bank_connection_id,
                        c.id, c.provider, c.access_token, c.last_accessed
                 FROM bank_accounts a
                 JOIN bank_connections c ON c.id = a.bank_connection_id
                 WHERE a.team_id = ?1 AND a.enabled = 1
                 ORDER BY a.id",
            )?;
            let rows = stmt.query_map(params![team], |row| {
                let account_type: String = row.get(3)?;
                Ok(EnabledAccount {
                    account: BankAccount {
                        id: row.get(0)?,
                        team_id: TeamId(row.get(1)?),
                        account_id: row.get(2)?,
                        account_type: AccountType::from_str(&account_type).map_err(|_| {
                            rusqlite::Error::InvalidColumnType(
                                3,
                                "account_type".to_string(),
                                rusqlite::types::Type::Text,
                            )
                        })?,
                        enabled: row.get(4)?,
                        balance: row.get(5)?,
                        bank_connection_id: row.get(6)?,
                    },
                    connection: BankConnection {
                        id: row.get(7)?,
                        provider: row.get(8)?,
                        access_token: row.get(9)?,
                        last_accessed: row.get(10)?,
                    },
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the stored balance for an account (last-write-wins).
pub async fn update_balance(db: &Database, account_id: &str, amount: f64) -> Result<(), SyncError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE bank_accounts SET balance = ?1 WHERE id = ?2",
                params![amount, account_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the stored balance for an account.
pub async fn get_balance(db: &Database, account_id: &str) -> Result<Option<f64>, SyncError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<f64>, rusqlite::Error> {
            conn.query_row(
                "SELECT balance FROM bank_accounts WHERE id = ?1",
                params![account_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::connections::create_connection;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn connection(id: &str) -> BankConnection {
        BankConnection {
            id: id.to_string(),
            provider: "plaid".to_string(),
            access_token: "token".to_string(),
            last_accessed: None,
        }
    }

    fn account(id: &str, team: &str, conn_id: &str, enabled: bool) -> BankAccount {
        BankAccount {
            id: id.to_string(),
            team_id: TeamId::from(team),
            account_id: format!("ext-{id}"),
            account_type: AccountType::Depository,
            enabled,
            balance: None,
            bank_connection_id: conn_id.to_string(),
        }
    }

    #[tokio::test]
    async fn enumeration_excludes_disabled_and_other_teams() {
        let (db, _dir) = setup_db().await;
        create_connection(&db, &connection("conn-1")).await.unwrap();

        create_account(&db, &account("acc-1", "T1", "conn-1", true)).await.unwrap();
        create_account(&db, &account("acc-2", "T1", "conn-1", false)).await.unwrap();
        create_account(&db, &account("acc-3", "T2", "conn-1", true)).await.unwrap();

        let enabled = list_enabled_with_connection(&db, &TeamId::from("T1")).await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].account.id, "acc-1");
        assert_eq!(enabled[0].connection.provider, "plaid");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn balance_update_overwrites_unconditionally() {
        let (db, _dir) = setup_db().await;
        create_connection(&db, &connection("conn-1")).await.unwrap();
        create_account(&db, &account("acc-1", "T1", "conn-1", true)).await.unwrap();

        update_balance(&db, "acc-1", 1250.55).await.unwrap();
        assert_eq!(get_balance(&db, "acc-1").await.unwrap(), Some(1250.55));

        // Last write wins, even when the value goes down.
        update_balance(&db, "acc-1", 900.00).await.unwrap();
        assert_eq!(get_balance(&db, "acc-1").await.unwrap(), Some(900.00));

        db.close().await.unwrap();
    }
}
