// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recurring-schedule registration at the start of a sync run.

use ledgersync_core::SchedulerAdapter;
use ledgersync_core::types::{ScheduleSpec, TeamId};
use tracing::debug;

/// Ensures a recurring interval trigger exists for the team.
///
/// Registration is an idempotent upsert on the scheduler side, so
/// calling this on every run keeps the entry fresh without duplicating
/// it. Failure is non-fatal: a missed re-registration means the team's
/// periodic sync lapses, but it must not block the already-triggered
/// run. Returns whether registration succeeded.
pub async fn ensure_schedule(
    scheduler: &dyn SchedulerAdapter,
    team_id: &TeamId,
    interval_seconds: u64,
) -> bool {
    let spec = ScheduleSpec::interval(interval_seconds);
    match scheduler.register(team_id, &spec).await {
        Ok(()) => true,
        Err(e) => {
            debug!(team = %team_id, error = %e, "schedule registration failed, continuing run");
            false
        }
    }
}
