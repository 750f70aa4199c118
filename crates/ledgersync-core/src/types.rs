// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the synchronization core.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque team identifier; the unit of tenancy and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Progress step of a sync run, published to the status channel.
///
/// Transitions monotonically forward except on the failure path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    ConnectingBank,
    GettingTransactions,
    Completed,
    Failed,
}

/// Bank account classification as reported by the aggregation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Depository,
    Credit,
    Loan,
    OtherAsset,
    OtherLiability,
}

/// Settlement status of a stored transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Posted,
    Pending,
}

/// A provider connection shared by one or more bank accounts.
///
/// Mutated only by the orchestrator (last-accessed refresh) after a sync
/// pass touches any of its accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankConnection {
    pub id: String,
    pub provider: String,
    pub access_token: String,
    /// RFC 3339 timestamp of the last sync pass that touched this connection.
    pub last_accessed: Option<String>,
}

/// A bank account owned by a team. Enabled accounts are the unit of
/// per-account sync work; disabled accounts are excluded entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    pub team_id: TeamId,
    /// External account identifier at the aggregation provider.
    pub account_id: String,
    pub account_type: AccountType,
    pub enabled: bool,
    pub balance: Option<f64>,
    pub bank_connection_id: String,
}

/// An enabled account joined with its owning connection, as enumerated
/// at the start of a sync run.
#[derive(Debug, Clone)]
pub struct EnabledAccount {
    pub account: BankAccount,
    pub connection: BankConnection,
}

/// A provider transaction as returned by the banking engine, before
/// transformation. Different providers populate different fields; only
/// `provider` is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Provider key the record was fetched under.
    pub provider: String,
    /// Stable external transaction identifier, when the provider has one.
    pub id: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    /// ISO 8601 date (`YYYY-MM-DD`).
    pub date: Option<String>,
    pub description: Option<String>,
    pub method: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub pending: bool,
}

/// Latest balance snapshot for an account. A missing amount means the
/// provider had nothing to report and the stored balance is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

/// The internal transaction record. `internal_id` is the idempotency
/// key: re-submitting an identical transaction never creates a duplicate
/// row, and stored rows are never mutated by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub internal_id: String,
    pub team_id: TeamId,
    pub bank_account_id: String,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    pub description: String,
    pub method: Option<String>,
    pub category: Option<String>,
    pub status: TransactionStatus,
}

/// A recurring interval schedule for a team. Interval is the only kind
/// the external scheduler supports; registering twice for the same team
/// replaces the prior entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    pub seconds: u64,
}

impl ScheduleSpec {
    pub fn interval(seconds: u64) -> Self {
        Self { seconds }
    }
}

/// The closed set of cache topics invalidated after a sync run.
///
/// Exactly these six tags are emitted, each parameterized by team, so the
/// contract is statically checkable rather than a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CacheTag {
    Connections,
    Transactions,
    Spending,
    Metrics,
    Accounts,
    Insights,
}

impl CacheTag {
    /// All six topics, in emission order.
    pub const ALL: [CacheTag; 6] = [
        CacheTag::Connections,
        CacheTag::Transactions,
        CacheTag::Spending,
        CacheTag::Metrics,
        CacheTag::Accounts,
        CacheTag::Insights,
    ];

    /// The team-scoped key readers subscribe to.
    pub fn cache_key(&self, team_id: &TeamId) -> String {
        let topic = match self {
            CacheTag::Connections => "bank_connections",
            CacheTag::Transactions => "transactions",
            CacheTag::Spending => "spending",
            CacheTag::Metrics => "metrics",
            CacheTag::Accounts => "bank_accounts",
            CacheTag::Insights => "insights",
        };
        format!("{topic}_{team_id}")
    }
}

/// Inbound trigger event starting one orchestrator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub team_id: String,
}

/// A durable sync-job queue entry (the inbound trigger channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: i64,
    pub payload: String,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: String,
    pub updated_at: String,
    pub locked_until: Option<String>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind a service trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Engine,
    Storage,
    Scheduler,
    Cache,
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sync_step_renders_snake_case() {
        assert_eq!(SyncStep::ConnectingBank.to_string(), "connecting_bank");
        assert_eq!(SyncStep::GettingTransactions.to_string(), "getting_transactions");
        assert_eq!(SyncStep::Completed.to_string(), "completed");
        assert_eq!(SyncStep::Failed.to_string(), "failed");
    }

    #[test]
    fn sync_step_round_trips_from_str() {
        for step in [
            SyncStep::ConnectingBank,
            SyncStep::GettingTransactions,
            SyncStep::Completed,
            SyncStep::Failed,
        ] {
            let parsed = SyncStep::from_str(&step.to_string()).expect("should parse back");
            assert_eq!(step, parsed);
        }
    }

    #[test]
    fn cache_tag_covers_exactly_six_topics() {
        assert_eq!(CacheTag::ALL.len(), 6);
        let keys: Vec<String> = CacheTag::ALL
            .iter()
            .map(|t| t.cache_key(&TeamId::from("T1")))
            .collect();
        assert_eq!(
            keys,
            vec![
                "bank_connections_T1",
                "transactions_T1",
                "spending_T1",
                "metrics_T1",
                "bank_accounts_T1",
                "insights_T1",
            ]
        );
    }

    #[test]
    fn account_type_parses_provider_strings() {
        assert_eq!(AccountType::from_str("depository").unwrap(), AccountType::Depository);
        assert_eq!(AccountType::from_str("other_asset").unwrap(), AccountType::OtherAsset);
        assert!(AccountType::from_str("checking").is_err());
    }

    #[test]
    fn trigger_event_deserializes_from_job_payload() {
        let event: TriggerEvent = serde_json::from_str(r#"{"team_id":"team-9"}"#).unwrap();
        assert_eq!(event.team_id, "team-9");
    }
}
