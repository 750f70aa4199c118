// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the banking aggregation engine.
//!
//! Provides [`EngineClient`] which handles request construction,
//! authentication, and transient error retry for the two engine
//! operations a sync run needs: transaction list and balance fetch.

use std::time::Duration;

use async_trait::async_trait;
use ledgersync_config::model::EngineConfig;
use ledgersync_core::types::{AccountType, Balance, RawTransaction};
use ledgersync_core::{AdapterType, BankingEngine, HealthStatus, ServiceAdapter, SyncError};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

/// HTTP client for engine API communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct EngineClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl EngineClient {
    /// Creates a new engine API client from configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| SyncError::Config(format!("invalid engine api_key: {e}")))?;
            headers.insert("authorization", value);
        }
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SyncError::Engine {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Issues a GET with one retry on transient status codes, returning
    /// the response body on success.
    async fn get_with_retry(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, SyncError> {
        let url = format!("{}{path}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying engine request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .get(&url)
                .query(query)
                .send()
                .await
                .map_err(|e| SyncError::Engine {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, path, attempt, "engine response received");

            if status.is_success() {
                return response.text().await.map_err(|e| SyncError::Engine {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let error = SyncError::Engine {
                message: engine_error_message(status, &body),
                source: None,
            };

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient engine error, will retry");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| SyncError::Engine {
            message: "engine request failed after retries".to_string(),
            source: None,
        }))
    }
}

/// Extract a readable message from an engine error body, falling back to
/// the raw body when it is not the structured error shape.
fn engine_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<crate::types::ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "engine returned {status}: {} ({})",
            api_err.error.message,
            api_err.error.code.as_deref().unwrap_or("unknown")
        ),
        Err(_) => format!("engine returned {status}: {body}"),
    }
}

fn is_transient_error(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}

#[async_trait]
impl ServiceAdapter for EngineClient {
    fn name(&self) -> &str {
        "engine-http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Engine
    }

    async fn health_check(&self) -> Result<HealthStatus, SyncError> {
        match self.get_with_retry("/health", &[]).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), SyncError> {
        // reqwest clients release their pool on drop.
        Ok(())
    }
}

#[async_trait]
impl BankingEngine for EngineClient {
    async fn list_transactions(
        &self,
        provider: &str,
        account_id: &str,
        account_type: AccountType,
    ) -> Result<Vec<RawTransaction>, SyncError> {
        let account_type = account_type.to_string();
        let body = self
            .get_with_retry(
                "/transactions",
                &[
                    ("provider", provider),
                    ("accountId", account_id),
                    ("accountType", account_type.as_str()),
                ],
            )
            .await?;

        let parsed: crate::types::ListTransactionsResponse = serde_json::from_str(&body)
            .map_err(|e| SyncError::Engine {
                message: format!("malformed transaction list response: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(provider, account_id, count = parsed.data.len(), "transactions fetched");
        Ok(parsed
            .data
            .into_iter()
            .map(|t| t.into_raw(provider))
            .collect())
    }

    async fn balance(
        &self,
        provider: &str,
        account_id: &str,
        access_token: &str,
    ) -> Result<Balance, SyncError> {
        let body = self
            .get_with_retry(
                "/accounts/balance",
                &[
                    ("provider", provider),
                    ("id", account_id),
                    ("accessToken", access_token),
                ],
            )
            .await?;

        let parsed: crate::types::BalanceResponse =
            serde_json::from_str(&body).map_err(|e| SyncError::Engine {
                message: format!("malformed balance response: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(parsed.data.into())
    }
}
