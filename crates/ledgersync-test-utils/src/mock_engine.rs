// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock banking engine adapter for deterministic testing.
//!
//! `MockEngine` implements `BankingEngine` with pre-configured per
//! external account responses, enabling fast, CI-runnable tests without
//! a real aggregation backend.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ledgersync_core::types::{AccountType, Balance, RawTransaction};
use ledgersync_core::{
    AdapterType, BankingEngine, HealthStatus, ServiceAdapter, SyncError,
};

/// A mock banking engine keyed by external account id.
///
/// Unconfigured accounts return an empty transaction list and an empty
/// balance. Accounts marked failing error on both operations, scoped to
/// that account's fetch.
pub struct MockEngine {
    transactions: Mutex<HashMap<String, Vec<RawTransaction>>>,
    balances: Mutex<HashMap<String, Balance>>,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            transactions: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            delay: Mutex::new(None),
        }
    }

    /// Pre-loads the transaction page returned for an external account.
    pub async fn set_transactions(&self, account_id: &str, raws: Vec<RawTransaction>) {
        self.transactions
            .lock()
            .await
            .insert(account_id.to_string(), raws);
    }

    /// Pre-loads the balance returned for an external account.
    pub async fn set_balance(&self, account_id: &str, balance: Balance) {
        self.balances
            .lock()
            .await
            .insert(account_id.to_string(), balance);
    }

    /// Makes both operations fail for an external account.
    pub async fn fail_account(&self, account_id: &str) {
        self.failing.lock().await.insert(account_id.to_string());
    }

    /// Delays every engine call, for tests exercising in-flight runs.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    async fn maybe_delay(&self) {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockEngine {
    fn name(&self) -> &str {
        "mock-engine"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Engine
    }

    async fn health_check(&self) -> Result<HealthStatus, SyncError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl BankingEngine for MockEngine {
    async fn list_transactions(
        &self,
        _provider: &str,
        account_id: &str,
        _account_type: AccountType,
    ) -> Result<Vec<RawTransaction>, SyncError> {
        self.maybe_delay().await;
        if self.failing.lock().await.contains(account_id) {
            return Err(SyncError::Engine {
                message: format!("provider unreachable for account {account_id}"),
                source: None,
            });
        }
        Ok(self
            .transactions
            .lock()
            .await
            .get(account_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn balance(
        &self,
        _provider: &str,
        account_id: &str,
        _access_token: &str,
    ) -> Result<Balance, SyncError> {
        self.maybe_delay().await;
        if self.failing.lock().await.contains(account_id) {
            return Err(SyncError::Engine {
                message: format!("provider unreachable for account {account_id}"),
                source: None,
            });
        }
        Ok(self
            .balances
            .lock()
            .await
            .get(account_id)
            .cloned()
            .unwrap_or_default())
    }
}
