// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the ledgersync service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level ledgersync configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgersyncConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Banking aggregation engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Job-platform relay settings (scheduler, cache, status endpoints).
    #[serde(default)]
    pub relay: RelayConfig,

    /// Sync orchestration settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

/// Banking aggregation engine client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Base URL of the aggregation engine API.
    #[serde(default = "default_engine_url")]
    pub base_url: String,

    /// Bearer token for engine authentication.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_engine_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_engine_url(),
            api_key: None,
            timeout_seconds: default_engine_timeout(),
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

/// Relay (job platform) client configuration.
///
/// The relay hosts the three outbound signal endpoints: schedule upsert,
/// cache-tag invalidation, and run-status updates.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Base URL of the job-platform API.
    #[serde(default = "default_relay_url")]
    pub base_url: String,

    /// Bearer token for relay authentication.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_relay_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_relay_url(),
            token: None,
            timeout_seconds: default_relay_timeout(),
        }
    }
}

/// Run outcome policy when some, but not all, accounts fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Any account failure fails the run (reference behavior).
    AnyFailed,
    /// The run fails only when every account failed (best-effort).
    AllFailed,
}

/// Sync orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Maximum transactions per storage write chunk.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,

    /// Maximum concurrent per-account tasks in one run.
    #[serde(default = "default_fan_out_limit")]
    pub fan_out_limit: usize,

    /// Recurring schedule interval registered per team, in seconds.
    #[serde(default = "default_schedule_interval")]
    pub schedule_interval_seconds: u64,

    /// How the run outcome is derived from per-account failures.
    #[serde(default = "default_failure_policy")]
    pub failure_policy: FailurePolicy,

    /// Trigger-queue poll interval for the serve loop, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_limit: default_batch_limit(),
            fan_out_limit: default_fan_out_limit(),
            schedule_interval_seconds: default_schedule_interval(),
            failure_policy: default_failure_policy(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_service_name() -> String {
    "ledgersync".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_engine_url() -> String {
    "http://127.0.0.1:8700".to_string()
}

fn default_engine_timeout() -> u64 {
    30
}

fn default_database_path() -> String {
    "ledgersync.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_relay_url() -> String {
    "http://127.0.0.1:8800".to_string()
}

fn default_relay_timeout() -> u64 {
    10
}

fn default_batch_limit() -> usize {
    300
}

fn default_fan_out_limit() -> usize {
    8
}

// Every 8 hours, matching the per-team recurring sync cadence.
fn default_schedule_interval() -> u64 {
    28_800
}

fn default_failure_policy() -> FailurePolicy {
    FailurePolicy::AnyFailed
}

fn default_poll_interval() -> u64 {
    5
}
