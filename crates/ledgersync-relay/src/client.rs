// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the job-platform relay.
//!
//! One [`RelayClient`] serves the three outbound signal families a sync
//! run emits: schedule registration (idempotent upsert keyed by team),
//! cache-tag invalidation, and run-status updates.

use std::time::Duration;

use async_trait::async_trait;
use ledgersync_config::model::RelayConfig;
use ledgersync_core::types::{CacheTag, ScheduleSpec, SyncStep, TeamId};
use ledgersync_core::{
    AdapterType, CacheChannel, HealthStatus, SchedulerAdapter, ServiceAdapter, StatusChannel,
    SyncError,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct ScheduleBody {
    kind: &'static str,
    seconds: u64,
}

#[derive(Serialize)]
struct RevalidateBody<'a> {
    tag: &'a str,
}

#[derive(Serialize)]
struct StatusBody {
    step: String,
}

/// HTTP client for the job platform's signal endpoints.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// Creates a new relay client from configuration.
    pub fn new(config: &RelayConfig) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| SyncError::Config(format!("invalid relay token: {e}")))?;
            headers.insert("authorization", value);
        }
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SyncError::Internal(format!("failed to build relay client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn send_json<B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}{path}", self.base_url);
        self.client
            .request(method, &url)
            .json(body)
            .send()
            .await?
            .error_for_status()
    }
}

#[async_trait]
impl ServiceAdapter for RelayClient {
    fn name(&self) -> &str {
        "relay-http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Scheduler
    }

    async fn health_check(&self) -> Result<HealthStatus, SyncError> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Degraded(format!(
                "relay health returned {}",
                resp.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

#[async_trait]
impl SchedulerAdapter for RelayClient {
    async fn register(&self, team_id: &TeamId, spec: &ScheduleSpec) -> Result<(), SyncError> {
        // PUT keyed by team: registering again replaces the prior entry.
        let body = ScheduleBody {
            kind: "interval",
            seconds: spec.seconds,
        };
        self.send_json(
            reqwest::Method::PUT,
            &format!("/schedules/{team_id}"),
            &body,
        )
        .await
        .map_err(|e| SyncError::Scheduling {
            message: format!("schedule registration failed for team {team_id}: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(team = %team_id, seconds = spec.seconds, "schedule registered");
        Ok(())
    }
}

#[async_trait]
impl CacheChannel for RelayClient {
    async fn invalidate(&self, tag: CacheTag, team_id: &TeamId) -> Result<(), SyncError> {
        let key = tag.cache_key(team_id);
        let body = RevalidateBody { tag: &key };
        self.send_json(reqwest::Method::POST, "/revalidate", &body)
            .await
            .map_err(|e| SyncError::Cache {
                message: format!("invalidation failed for tag {key}: {e}"),
            })?;
        debug!(tag = %key, "cache tag invalidated");
        Ok(())
    }
}

#[async_trait]
impl StatusChannel for RelayClient {
    async fn update(&self, team_id: &TeamId, step: SyncStep) -> Result<(), SyncError> {
        let body = StatusBody {
            step: step.to_string(),
        };
        self.send_json(
            reqwest::Method::POST,
            &format!("/runs/{team_id}/status"),
            &body,
        )
        .await
        .map_err(|e| SyncError::Internal(format!("status update failed: {e}")))?;
        debug!(team = %team_id, step = %step, "run status published");
        Ok(())
    }
}
