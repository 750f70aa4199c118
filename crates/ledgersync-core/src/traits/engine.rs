// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Banking aggregation engine trait (transaction list, balance fetch).

use async_trait::async_trait;

use crate::error::SyncError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{AccountType, Balance, RawTransaction};

/// The external banking-aggregation client abstraction.
///
/// Both operations may fail with provider or network errors; such
/// failures are scoped to the calling account's task and never abort
/// sibling accounts.
#[async_trait]
pub trait BankingEngine: ServiceAdapter {
    /// Fetches all raw transactions for an external account.
    async fn list_transactions(
        &self,
        provider: &str,
        account_id: &str,
        account_type: AccountType,
    ) -> Result<Vec<RawTransaction>, SyncError>;

    /// Fetches the latest balance snapshot for an external account.
    async fn balance(
        &self,
        provider: &str,
        account_id: &str,
        access_token: &str,
    ) -> Result<Balance, SyncError>;
}
