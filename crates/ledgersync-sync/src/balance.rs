// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Applies fetched balance snapshots to stored accounts.

use ledgersync_core::SyncStorage;
use ledgersync_core::SyncError;
use ledgersync_core::types::Balance;
use tracing::debug;

/// Writes a fetched balance to the stored account record.
///
/// Balance is a point-in-time snapshot, so a defined amount overwrites
/// the stored value unconditionally (last-write-wins). A missing amount
/// is a no-op, not an error. Returns whether a write happened.
pub async fn apply_balance(
    storage: &dyn SyncStorage,
    account_id: &str,
    balance: &Balance,
) -> Result<bool, SyncError> {
    match balance.amount {
        Some(amount) => {
            storage.update_account_balance(account_id, amount).await?;
            debug!(account = account_id, amount, "balance updated");
            Ok(true)
        }
        None => {
            debug!(account = account_id, "no balance reported, keeping stored value");
            Ok(false)
        }
    }
}
