// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations: the serve loop, one-shot sync, trigger
//! enqueueing, and backend health checks.
//!
//! `serve` polls the durable sync-job queue and drives one orchestrator
//! run per dequeued trigger. Jobs are acknowledged on success and failed
//! back into the queue (with bounded retry) otherwise.

use std::sync::Arc;
use std::time::Duration;

use ledgersync_config::model::LedgersyncConfig;
use ledgersync_core::types::{TeamId, TriggerEvent};
use ledgersync_core::{ServiceAdapter, SyncError, SyncStorage};
use ledgersync_engine::EngineClient;
use ledgersync_relay::RelayClient;
use ledgersync_storage::SqliteStore;
use ledgersync_sync::SyncOrchestrator;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::shutdown;

/// Initializes the tracing subscriber from the configured log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ledgersync={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

struct Services {
    storage: Arc<SqliteStore>,
    engine: Arc<EngineClient>,
    relay: Arc<RelayClient>,
    orchestrator: SyncOrchestrator,
}

/// Constructs and initializes the full adapter stack.
async fn build_services(config: &LedgersyncConfig) -> Result<Services, SyncError> {
    let storage = Arc::new(SqliteStore::new(config.storage.clone()));
    storage.initialize().await?;

    let engine = Arc::new(EngineClient::new(&config.engine)?);
    let relay = Arc::new(RelayClient::new(&config.relay)?);

    let orchestrator = SyncOrchestrator::new(
        engine.clone(),
        storage.clone(),
        relay.clone(),
        relay.clone(),
        relay.clone(),
        config.sync.clone(),
    );

    Ok(Services {
        storage,
        engine,
        relay,
        orchestrator,
    })
}

/// Runs the `ledgersync serve` command.
///
/// Enters the trigger-queue poll loop until a shutdown signal arrives,
/// then closes storage cleanly.
pub async fn run_serve(config: LedgersyncConfig) -> Result<(), SyncError> {
    info!(service = %config.service.name, "starting ledgersync serve");

    let services = build_services(&config).await?;
    let cancel = shutdown::install_signal_handler();
    let poll_interval = Duration::from_secs(config.sync.poll_interval_seconds);

    while !cancel.is_cancelled() {
        match services.storage.dequeue_job().await {
            Ok(Some(job)) => {
                handle_job(&services, job.id, &job.payload, &cancel).await;
            }
            Ok(None) => {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(poll_interval) => {}
                }
            }
            Err(e) => {
                error!(error = %e, "failed to poll trigger queue");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(poll_interval) => {}
                }
            }
        }
    }

    info!("serve loop stopped, shutting down");
    services.engine.shutdown().await?;
    services.relay.shutdown().await?;
    services.storage.close().await?;
    Ok(())
}

async fn handle_job(services: &Services, job_id: i64, payload: &str, cancel: &CancellationToken) {
    let event: TriggerEvent = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(e) => {
            warn!(job = job_id, error = %e, "malformed trigger payload");
            if let Err(e) = services.storage.fail_job(job_id).await {
                error!(job = job_id, error = %e, "failed to mark job failed");
            }
            return;
        }
    };

    let team = TeamId(event.team_id);
    match services.orchestrator.sync_team(&team, cancel).await {
        Ok(report) => {
            info!(
                job = job_id,
                team = %team,
                written = report.transactions_written,
                failed = report.accounts_failed,
                "sync job completed"
            );
            if let Err(e) = services.storage.ack_job(job_id).await {
                error!(job = job_id, error = %e, "failed to ack job");
            }
        }
        Err(e) => {
            error!(job = job_id, team = %team, error = %e, "sync job failed");
            if let Err(e) = services.storage.fail_job(job_id).await {
                error!(job = job_id, error = %e, "failed to mark job failed");
            }
        }
    }
}

/// Runs one sync pass for a team and exits.
pub async fn run_once(config: LedgersyncConfig, team: &str) -> Result<(), SyncError> {
    let services = build_services(&config).await?;
    let cancel = shutdown::install_signal_handler();

    let team = TeamId::from(team);
    let result = services.orchestrator.sync_team(&team, &cancel).await;
    services.storage.close().await?;

    let report = result?;
    println!(
        "synced team {}: {} accounts, {} transactions written, {} records skipped",
        report.team_id,
        report.accounts_total,
        report.transactions_written,
        report.records_skipped
    );
    for (account, e) in &report.failures {
        println!("  account {account} failed: {e}");
    }
    Ok(())
}

/// Enqueues a sync trigger for a team on the durable queue.
pub async fn enqueue(config: LedgersyncConfig, team: &str) -> Result<(), SyncError> {
    let storage = SqliteStore::new(config.storage.clone());
    storage.initialize().await?;

    let payload = serde_json::to_string(&TriggerEvent {
        team_id: team.to_string(),
    })
    .map_err(|e| SyncError::Internal(format!("failed to encode trigger: {e}")))?;
    let job_id = storage.enqueue_job(&payload).await?;
    storage.close().await?;

    println!("enqueued sync for team {team} as job {job_id}");
    Ok(())
}

/// Checks health of the storage, engine, and relay backends.
pub async fn run_doctor(config: LedgersyncConfig) -> Result<(), SyncError> {
    let services = build_services(&config).await?;

    let adapters: Vec<Arc<dyn ServiceAdapter>> = vec![
        services.storage.clone(),
        services.engine.clone(),
        services.relay.clone(),
    ];
    let mut unhealthy = false;
    for adapter in &adapters {
        let status = adapter.health_check().await?;
        match &status {
            ledgersync_core::HealthStatus::Healthy => {
                println!("{}: healthy", adapter.name());
            }
            ledgersync_core::HealthStatus::Degraded(detail) => {
                println!("{}: degraded ({detail})", adapter.name());
            }
            ledgersync_core::HealthStatus::Unhealthy(detail) => {
                println!("{}: unhealthy ({detail})", adapter.name());
                unhealthy = true;
            }
        }
    }
    services.storage.close().await?;

    if unhealthy {
        return Err(SyncError::Internal("one or more backends unhealthy".into()));
    }
    Ok(())
}
