// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bank connection operations.

use ledgersync_core::SyncError;
use ledgersync_core::types::BankConnection;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Insert a new bank connection.
pub async fn create_connection(db: &Database, connection: &BankConnection) -> Result<(), SyncError> {
    let c = connection.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO bank_connections (id, provider, access_token, last_accessed)
                 VALUES (?1, ?2, ?3, ?4)",
                params![c.id, c.provider, c.access_token, c.last_accessed],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Refresh a connection's last-accessed timestamp to now.
pub async fn touch_last_accessed(db: &Database, connection_id: &str) -> Result<(), SyncError> {
    let connection_id = connection_id.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE bank_connections
                 SET last_accessed = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![connection_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a connection by id.
pub async fn get_connection(
    db: &Database,
    connection_id: &str,
) -> Result<Option<BankConnection>, SyncError> {
    let connection_id = connection_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<BankConnection>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, provider, access_token, last_accessed
                 FROM bank_connections WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![connection_id], |row| {
                Ok(BankConnection {
                    id: row.get(0)?,
                    provider: row.get(1)?,
                    access_token: row.get(2)?,
                    last_accessed: row.get(3)?,
                })
            });
            match result {
                Ok(connection) => Ok(Some(connection)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn sample_connection() -> BankConnection {
        BankConnection {
            id: "conn-1".to_string(),
            provider: "plaid".to_string(),
            access_token: "token-1".to_string(),
            last_accessed: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_connection() {
        let (db, _dir) = setup_db().await;
        create_connection(&db, &sample_connection()).await.unwrap();

        let fetched = get_connection(&db, "conn-1").await.unwrap().unwrap();
        assert_eq!(fetched.provider, "plaid");
        assert!(fetched.last_accessed.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn touch_sets_last_accessed() {
        let (db, _dir) = setup_db().await;
        create_connection(&db, &sample_connection()).await.unwrap();

        touch_last_accessed(&db, "conn-1").await.unwrap();

        let fetched = get_connection(&db, "conn-1").await.unwrap().unwrap();
        let stamp = fetched.last_accessed.expect("timestamp should be set");
        assert!(stamp.ends_with('Z'));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_connection_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_connection(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
