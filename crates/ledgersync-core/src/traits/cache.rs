// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache invalidation channel trait.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{CacheTag, TeamId};

/// Publishes tag invalidations to downstream cache readers.
///
/// Invalidation is fire-and-forget from the orchestrator's perspective;
/// delivery failures are logged by the caller, never propagated into the
/// run outcome.
#[async_trait]
pub trait CacheChannel: ServiceAdapter {
    /// Invalidates all cached results for one team-scoped tag.
    async fn invalidate(&self, tag: CacheTag, team_id: &TeamId) -> Result<(), SyncError>;
}
