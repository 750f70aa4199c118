// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the banking aggregation engine API.

use ledgersync_core::types::{Balance, RawTransaction};
use serde::Deserialize;

/// Envelope for the transaction list endpoint: `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsResponse {
    #[serde(default)]
    pub data: Vec<WireTransaction>,
}

/// Envelope for the balance endpoint: `{ "data": { "amount": ... } }`.
#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub data: WireBalance,
}

/// A provider transaction as it appears on the wire. Providers differ in
/// which optional fields they populate.
#[derive(Debug, Clone, Deserialize)]
pub struct WireTransaction {
    pub id: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub method: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub pending: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireBalance {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

/// Error body returned by the engine API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: Option<String>,
    pub message: String,
}

impl WireTransaction {
    /// Stamp the provider the record was fetched under and convert into
    /// the provider-agnostic raw representation.
    pub fn into_raw(self, provider: &str) -> RawTransaction {
        RawTransaction {
            provider: provider.to_string(),
            id: self.id,
            amount: self.amount,
            currency: self.currency,
            date: self.date,
            description: self.description,
            method: self.method,
            category: self.category,
            pending: self.pending,
        }
    }
}

impl From<WireBalance> for Balance {
    fn from(wire: WireBalance) -> Self {
        Balance {
            amount: wire.amount,
            currency: wire.currency,
        }
    }
}
