// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status channel trait for publishing run progress.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{SyncStep, TeamId};

/// Publishes sync-run step transitions for UI consumers.
///
/// Status records are a transient progress signal, not durable state;
/// they are discarded once the run ends.
#[async_trait]
pub trait StatusChannel: ServiceAdapter {
    /// Publishes a step transition for the given team's run.
    async fn update(&self, team_id: &TeamId, step: SyncStep) -> Result<(), SyncError>;
}
