// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end sync testing.
//!
//! `SyncHarness` assembles a temp SQLite database plus the mock engine,
//! scheduler, cache, and status adapters, ready to be wired into an
//! orchestrator by the test.

use std::sync::Arc;

use ledgersync_config::model::StorageConfig;
use ledgersync_core::SyncStorage;
use ledgersync_core::types::{AccountType, BankAccount, BankConnection, TeamId};
use ledgersync_core::SyncError;
use ledgersync_storage::SqliteStore;
use tempfile::TempDir;

use crate::mock_engine::MockEngine;
use crate::mock_relay::{MockCache, MockScheduler, MockStatus};

/// Builder for creating seeded test environments.
pub struct SyncHarnessBuilder {
    connections: Vec<BankConnection>,
    accounts: Vec<BankAccount>,
}

impl SyncHarnessBuilder {
    fn new() -> Self {
        Self {
            connections: Vec::new(),
            accounts: Vec::new(),
        }
    }

    /// Seeds a bank connection at build time.
    pub fn with_connection(mut self, connection: BankConnection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Seeds a bank account at build time. Its connection must also be
    /// seeded.
    pub fn with_account(mut self, account: BankAccount) -> Self {
        self.accounts.push(account);
        self
    }

    /// Builds the harness: temp database, migrations, seed rows, mocks.
    pub async fn build(self) -> Result<SyncHarness, SyncError> {
        let temp_dir = TempDir::new().map_err(|e| SyncError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;

        for connection in &self.connections {
            storage.create_connection(connection).await?;
        }
        for account in &self.accounts {
            storage.create_account(account).await?;
        }

        Ok(SyncHarness {
            storage: Arc::new(storage),
            engine: Arc::new(MockEngine::new()),
            scheduler: Arc::new(MockScheduler::new()),
            cache: Arc::new(MockCache::new()),
            status: Arc::new(MockStatus::new()),
            _temp_dir: temp_dir,
        })
    }
}

/// A complete mock environment for sync tests.
pub struct SyncHarness {
    pub storage: Arc<SqliteStore>,
    pub engine: Arc<MockEngine>,
    pub scheduler: Arc<MockScheduler>,
    pub cache: Arc<MockCache>,
    pub status: Arc<MockStatus>,
    _temp_dir: TempDir,
}

impl SyncHarness {
    pub fn builder() -> SyncHarnessBuilder {
        SyncHarnessBuilder::new()
    }
}

/// Fixture connection with a plaid provider and a static token.
pub fn test_connection(id: &str) -> BankConnection {
    BankConnection {
        id: id.to_string(),
        provider: "plaid".to_string(),
        access_token: format!("token-{id}"),
        last_accessed: None,
    }
}

/// Fixture enabled depository account.
pub fn test_account(
    id: &str,
    team_id: &str,
    external_id: &str,
    connection_id: &str,
) -> BankAccount {
    BankAccount {
        id: id.to_string(),
        team_id: TeamId::from(team_id),
        account_id: external_id.to_string(),
        account_type: AccountType::Depository,
        enabled: true,
        balance: None,
        bank_connection_id: connection_id.to_string(),
    }
}
