// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for the sync core's persistence operations.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{EnabledAccount, TeamId, Transaction};

/// Persistence operations required by a sync run.
///
/// `upsert_transactions` is the idempotent write primitive the batch
/// processor is built on: keyed by `internal_id`, duplicates are
/// silently skipped rather than erroring or overwriting.
#[async_trait]
pub trait SyncStorage: ServiceAdapter {
    /// Initializes the storage backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), SyncError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), SyncError>;

    /// Enumerates a team's enabled bank accounts with their connections.
    async fn list_enabled_accounts(
        &self,
        team_id: &TeamId,
    ) -> Result<Vec<EnabledAccount>, SyncError>;

    /// Upserts one chunk of transactions, skipping rows whose
    /// `internal_id` already exists. Returns the number actually inserted.
    async fn upsert_transactions(&self, batch: &[Transaction]) -> Result<usize, SyncError>;

    /// Overwrites the stored balance for an account (last-write-wins).
    async fn update_account_balance(
        &self,
        account_id: &str,
        amount: f64,
    ) -> Result<(), SyncError>;

    /// Refreshes a connection's last-accessed timestamp to now.
    async fn touch_connection(&self, connection_id: &str) -> Result<(), SyncError>;
}
