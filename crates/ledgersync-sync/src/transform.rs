// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure transformation from provider raw transactions to the internal
//! record, including fingerprint computation.
//!
//! `transform` is deterministic: the same raw input always yields the
//! same output, fingerprint included. That stability is what makes the
//! batched upsert idempotent across repeated runs.

use chrono::NaiveDate;
use ledgersync_core::SyncError;
use ledgersync_core::types::{RawTransaction, TeamId, Transaction, TransactionStatus};
use sha2::{Digest, Sha256};

/// Computes the idempotency key for a raw transaction.
///
/// When the provider supplies a stable external id, the fingerprint is
/// derived from `provider:accountId:externalId`. Otherwise it falls
/// back to a deterministic composite of the identifying fields.
fn fingerprint(raw: &RawTransaction, bank_account_id: &str) -> String {
    let mut hasher = Sha256::new();
    match &raw.id {
        Some(external_id) => {
            hasher.update(raw.provider.as_bytes());
            hasher.update(b":");
            hasher.update(bank_account_id.as_bytes());
            hasher.update(b":");
            hasher.update(external_id.as_bytes());
        }
        None => {
            hasher.update(raw.provider.as_bytes());
            hasher.update(b":");
            hasher.update(bank_account_id.as_bytes());
            hasher.update(b":");
            hasher.update(raw.date.as_deref().unwrap_or_default().as_bytes());
            hasher.update(b":");
            // Fixed precision keeps the digest stable across float
            // formatting differences.
            hasher.update(format!("{:.2}", raw.amount.unwrap_or_default()).as_bytes());
            hasher.update(b":");
            hasher.update(raw.description.as_deref().unwrap_or_default().as_bytes());
        }
    }
    hex::encode(hasher.finalize())
}

/// Maps one raw provider transaction to the internal record.
///
/// Fails only on structurally invalid input (missing amount, missing or
/// unparseable date, missing currency); the error names the offending
/// record so a single bad row never poisons the rest of its batch.
pub fn transform(
    raw: &RawTransaction,
    team_id: &TeamId,
    bank_account_id: &str,
) -> Result<Transaction, SyncError> {
    let label = raw.id.as_deref().unwrap_or("<no external id>");

    let amount = raw.amount.ok_or_else(|| SyncError::Transform {
        message: format!("transaction {label} from {} has no amount", raw.provider),
    })?;

    let date_str = raw.date.as_deref().ok_or_else(|| SyncError::Transform {
        message: format!("transaction {label} from {} has no date", raw.provider),
    })?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        SyncError::Transform {
            message: format!("transaction {label} has invalid date {date_str:?}: {e}"),
        }
    })?;

    let currency = raw.currency.as_deref().ok_or_else(|| SyncError::Transform {
        message: format!("transaction {label} from {} has no currency", raw.provider),
    })?;

    let status = if raw.pending {
        TransactionStatus::Pending
    } else {
        TransactionStatus::Posted
    };

    Ok(Transaction {
        internal_id: fingerprint(raw, bank_account_id),
        team_id: team_id.clone(),
        bank_account_id: bank_account_id.to_string(),
        // Negative zero collapses so the stored amount has one canonical
        // representation.
        amount: if amount == 0.0 { 0.0 } else { amount },
        currency: currency.to_uppercase(),
        date,
        description: raw.description.clone().unwrap_or_default(),
        method: raw.method.clone(),
        category: raw.category.clone(),
        status,
    })
}

/// Transforms a fetched page of raw transactions, separating records
/// that transformed cleanly from per-record failures.
pub fn transform_batch(
    raws: &[RawTransaction],
    team_id: &TeamId,
    bank_account_id: &str,
) -> (Vec<Transaction>, Vec<SyncError>) {
    let mut out = Vec::with_capacity(raws.len());
    let mut failures = Vec::new();
    for raw in raws {
        match transform(raw, team_id, bank_account_id) {
            Ok(txn) => out.push(txn),
            Err(e) => failures.push(e),
        }
    }
    (out, failures)
}
