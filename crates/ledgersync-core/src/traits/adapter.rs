// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait implemented by every external-collaborator adapter.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all ledgersync service adapters.
///
/// Every adapter (engine, storage, scheduler, cache, status) implements
/// this trait, which provides identity, lifecycle, and health check
/// capabilities. Adapters are explicitly constructed and injected into
/// the orchestrator; there are no process-wide singletons.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (engine, storage, scheduler, etc.).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, SyncError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), SyncError>;
}
