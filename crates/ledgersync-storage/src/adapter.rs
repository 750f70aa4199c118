// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the SyncStorage trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use ledgersync_config::model::StorageConfig;
use ledgersync_core::types::{EnabledAccount, SyncJob, TeamId, Transaction};
use ledgersync_core::{AdapterType, HealthStatus, ServiceAdapter, SyncError, SyncStorage};

use crate::database::Database;
use crate::queries;

/// SQLite-backed sync storage.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`SyncStorage::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`SyncStorage::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, SyncError> {
        self.db.get().ok_or_else(|| SyncError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    // --- Provisioning (harness, CLI seeding) ---

    pub async fn create_connection(
        &self,
        connection: &ledgersync_core::types::BankConnection,
    ) -> Result<(), SyncError> {
        queries::connections::create_connection(self.db()?, connection).await
    }

    pub async fn create_account(
        &self,
        account: &ledgersync_core::types::BankAccount,
    ) -> Result<(), SyncError> {
        queries::accounts::create_account(self.db()?, account).await
    }

    pub async fn get_connection(
        &self,
        connection_id: &str,
    ) -> Result<Option<ledgersync_core::types::BankConnection>, SyncError> {
        queries::connections::get_connection(self.db()?, connection_id).await
    }

    pub async fn account_balance(&self, account_id: &str) -> Result<Option<f64>, SyncError> {
        queries::accounts::get_balance(self.db()?, account_id).await
    }

    pub async fn transaction_count(&self, team_id: &TeamId) -> Result<i64, SyncError> {
        queries::transactions::count_for_team(self.db()?, team_id).await
    }

    pub async fn transaction_ids(&self, team_id: &TeamId) -> Result<Vec<String>, SyncError> {
        queries::transactions::internal_ids_for_team(self.db()?, team_id).await
    }

    // --- Trigger queue ---

    pub async fn enqueue_job(&self, payload: &str) -> Result<i64, SyncError> {
        queries::jobs::enqueue(self.db()?, payload).await
    }

    pub async fn dequeue_job(&self) -> Result<Option<SyncJob>, SyncError> {
        queries::jobs::dequeue(self.db()?).await
    }

    pub async fn ack_job(&self, id: i64) -> Result<(), SyncError> {
        queries::jobs::ack(self.db()?, id).await
    }

    pub async fn fail_job(&self, id: i64) -> Result<(), SyncError> {
        queries::jobs::fail(self.db()?, id).await
    }
}

#[async_trait]
impl ServiceAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SyncError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SyncError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SyncStorage for SqliteStore {
    async fn initialize(&self) -> Result<(), SyncError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SyncError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SyncError> {
        self.db()?.close().await
    }

    async fn list_enabled_accounts(
        &self,
        team_id: &TeamId,
    ) -> Result<Vec<EnabledAccount>, SyncError> {
        queries::accounts::list_enabled_with_connection(self.db()?, team_id).await
    }

    async fn upsert_transactions(&self, batch: &[Transaction]) -> Result<usize, SyncError> {
        queries::transactions::upsert_many(self.db()?, batch).await
    }

    async fn update_account_balance(
        &self,
        account_id: &str,
        amount: f64,
    ) -> Result<(), SyncError> {
        queries::accounts::update_balance(self.db()?, account_id, amount).await
    }

    async fn touch_connection(&self, connection_id: &str) -> Result<(), SyncError> {
        queries::connections::touch_last_accessed(self.db()?, connection_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgersync_core::types::{
        AccountType, BankAccount, BankConnection, TransactionStatus,
    };
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    async fn initialized_store(dir: &tempfile::TempDir) -> SqliteStore {
        let db_path = dir.path().join("store.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn store_implements_service_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("adapter.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let store = initialized_store(&dir).await;
        assert!(store.initialize().await.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        assert!(store.health_check().await.is_err());
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let store = initialized_store(&dir).await;
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn full_sync_write_path_through_adapter() {
        let dir = tempdir().unwrap();
        let store = initialized_store(&dir).await;

        store
            .create_connection(&BankConnection {
                id: "conn-1".to_string(),
                provider: "gocardless".to_string(),
                access_token: "token".to_string(),
                last_accessed: None,
            })
            .await
            .unwrap();
        store
            .create_account(&BankAccount {
                id: "acc-1".to_string(),
                team_id: TeamId::from("T1"),
                account_id: "ext-1".to_string(),
                account_type: AccountType::Credit,
                enabled: true,
                balance: None,
                bank_connection_id: "conn-1".to_string(),
            })
            .await
            .unwrap();

        let accounts = store.list_enabled_accounts(&TeamId::from("T1")).await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].connection.provider, "gocardless");

        let batch = vec![Transaction {
            internal_id: "fp-1".to_string(),
            team_id: TeamId::from("T1"),
            bank_account_id: "acc-1".to_string(),
            amount: -10.0,
            currency: "EUR".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            description: "Lunch".to_string(),
            method: None,
            category: None,
            status: TransactionStatus::Posted,
        }];
        assert_eq!(store.upsert_transactions(&batch).await.unwrap(), 1);
        assert_eq!(store.upsert_transactions(&batch).await.unwrap(), 0);

        store.update_account_balance("acc-1", 500.0).await.unwrap();
        assert_eq!(store.account_balance("acc-1").await.unwrap(), Some(500.0));

        store.touch_connection("conn-1").await.unwrap();
        let conn = store.get_connection("conn-1").await.unwrap().unwrap();
        assert!(conn.last_accessed.is_some());

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn job_queue_through_adapter() {
        let dir = tempdir().unwrap();
        let store = initialized_store(&dir).await;

        let id = store.enqueue_job(r#"{"team_id":"T1"}"#).await.unwrap();
        let job = store.dequeue_job().await.unwrap().unwrap();
        assert_eq!(job.id, id);
        store.ack_job(id).await.unwrap();

        store.close().await.unwrap();
    }
}
