// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock scheduler, cache, and status adapters with call capture.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use ledgersync_core::types::{CacheTag, ScheduleSpec, SyncStep, TeamId};
use ledgersync_core::{
    AdapterType, CacheChannel, HealthStatus, SchedulerAdapter, ServiceAdapter, StatusChannel,
    SyncError,
};

/// Mock scheduling service recording one entry per team.
///
/// The map mirrors the real service's upsert semantics: registering a
/// team again replaces its interval rather than adding an entry.
pub struct MockScheduler {
    entries: Mutex<HashMap<String, u64>>,
    fail: Mutex<bool>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fail: Mutex::new(false),
        }
    }

    /// Makes subsequent registrations fail.
    pub async fn set_failing(&self, fail: bool) {
        *self.fail.lock().await = fail;
    }

    /// Snapshot of registered entries (team id to interval seconds).
    pub async fn entries(&self) -> HashMap<String, u64> {
        self.entries.lock().await.clone()
    }
}

impl Default for MockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockScheduler {
    fn name(&self) -> &str {
        "mock-scheduler"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Scheduler
    }

    async fn health_check(&self) -> Result<HealthStatus, SyncError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl SchedulerAdapter for MockScheduler {
    async fn register(&self, team_id: &TeamId, spec: &ScheduleSpec) -> Result<(), SyncError> {
        if *self.fail.lock().await {
            return Err(SyncError::Scheduling {
                message: "scheduling backend unavailable".into(),
                source: None,
            });
        }
        self.entries
            .lock()
            .await
            .insert(team_id.to_string(), spec.seconds);
        Ok(())
    }
}

/// Mock cache channel recording every invalidated tag key.
pub struct MockCache {
    invalidated: Mutex<Vec<String>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self {
            invalidated: Mutex::new(Vec::new()),
        }
    }

    /// All tag keys invalidated so far, in emission order.
    pub async fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().await.clone()
    }
}

impl Default for MockCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockCache {
    fn name(&self) -> &str {
        "mock-cache"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Cache
    }

    async fn health_check(&self) -> Result<HealthStatus, SyncError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl CacheChannel for MockCache {
    async fn invalidate(&self, tag: CacheTag, team_id: &TeamId) -> Result<(), SyncError> {
        self.invalidated.lock().await.push(tag.cache_key(team_id));
        Ok(())
    }
}

/// Mock status channel recording step transitions per team.
pub struct MockStatus {
    steps: Mutex<Vec<(String, SyncStep)>>,
}

impl MockStatus {
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
        }
    }

    /// Recorded (team id, step) transitions in publication order.
    pub async fn steps(&self) -> Vec<(String, SyncStep)> {
        self.steps.lock().await.clone()
    }

    /// Steps recorded for one team, in order.
    pub async fn steps_for(&self, team_id: &TeamId) -> Vec<SyncStep> {
        self.steps
            .lock()
            .await
            .iter()
            .filter(|(team, _)| team == &team_id.to_string())
            .map(|(_, step)| *step)
            .collect()
    }
}

impl Default for MockStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockStatus {
    fn name(&self) -> &str {
        "mock-status"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Status
    }

    async fn health_check(&self) -> Result<HealthStatus, SyncError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl StatusChannel for MockStatus {
    async fn update(&self, team_id: &TeamId, step: SyncStep) -> Result<(), SyncError> {
        self.steps.lock().await.push((team_id.to_string(), step));
        Ok(())
    }
}
