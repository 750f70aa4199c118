// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-team run locks preventing overlapping sync runs.

use std::collections::HashSet;
use std::sync::Mutex;

use ledgersync_core::SyncError;
use ledgersync_core::types::TeamId;

/// Tracks which teams currently have a sync run in flight.
///
/// Overlapping runs for one team would double-fetch and double-invalidate;
/// idempotent writes bound the damage to wasted work, but the lock avoids
/// even that. The lock is in-process: one orchestrator instance owns the
/// team's runs.
#[derive(Debug, Default)]
pub struct RunLocks {
    active: Mutex<HashSet<String>>,
}

impl RunLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the run lock for a team, or fails with
    /// [`SyncError::RunInProgress`] if a run is already in flight.
    /// The lock is released when the returned guard drops.
    pub fn acquire(&self, team_id: &TeamId) -> Result<RunGuard<'_>, SyncError> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(team_id.0.clone()) {
            return Err(SyncError::RunInProgress {
                team_id: team_id.0.clone(),
            });
        }
        Ok(RunGuard {
            locks: self,
            team: team_id.0.clone(),
        })
    }
}

/// RAII guard for one team's run lock.
#[derive(Debug)]
pub struct RunGuard<'a> {
    locks: &'a RunLocks,
    team: String,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut active = self
            .locks
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        active.remove(&self.team);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_for_same_team_is_rejected() {
        let locks = RunLocks::new();
        let team = TeamId::from("T1");
        let _guard = locks.acquire(&team).unwrap();
        let err = locks.acquire(&team).unwrap_err();
        assert!(matches!(err, SyncError::RunInProgress { .. }));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let locks = RunLocks::new();
        let team = TeamId::from("T1");
        drop(locks.acquire(&team).unwrap());
        assert!(locks.acquire(&team).is_ok());
    }

    #[test]
    fn distinct_teams_do_not_contend() {
        let locks = RunLocks::new();
        let _a = locks.acquire(&TeamId::from("T1")).unwrap();
        let _b = locks.acquire(&TeamId::from("T2")).unwrap();
    }
}
