// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Team-scoped cache invalidation after a sync run settles.

use ledgersync_core::{CacheChannel, CacheTag};
use ledgersync_core::types::TeamId;
use tracing::warn;

/// Emits one invalidation per topic in [`CacheTag::ALL`] for the team.
///
/// Called exactly once per run, after all per-account work has settled,
/// so downstream readers see the most complete picture available even
/// when some accounts failed. Delivery failures are logged and do not
/// affect the run outcome; remaining tags are still attempted.
pub async fn invalidate_team(cache: &dyn CacheChannel, team_id: &TeamId) {
    for tag in CacheTag::ALL {
        if let Err(e) = cache.invalidate(tag, team_id).await {
            warn!(team = %team_id, tag = %tag, error = %e, "cache invalidation failed");
        }
    }
}
