// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduler trait for the external recurring-trigger service.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{ScheduleSpec, TeamId};

/// Registers recurring interval triggers with the external scheduling
/// service. The service owns the timer; this trait only registers and
/// replaces schedule entries.
#[async_trait]
pub trait SchedulerAdapter: ServiceAdapter {
    /// Idempotently registers a recurring schedule for a team.
    ///
    /// Calling again with the same team replaces any prior entry rather
    /// than adding a second one.
    async fn register(&self, team_id: &TeamId, spec: &ScheduleSpec) -> Result<(), SyncError>;
}
