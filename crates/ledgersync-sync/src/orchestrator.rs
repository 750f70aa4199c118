// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level sync driver: per-team fan-out over enabled accounts.
//!
//! One run moves through `connecting_bank -> getting_transactions ->
//! completed`, with `failed` reachable when the aggregate per-account
//! outcome crosses the configured failure policy. Per-account tasks run
//! concurrently under a fan-out limit; each task's errors are collected,
//! never silently dropped, and the orchestrator decides the run outcome
//! after all tasks have settled.

use std::collections::HashSet;
use std::sync::Arc;

use ledgersync_config::model::{FailurePolicy, SyncConfig};
use ledgersync_core::types::{EnabledAccount, TeamId};
use ledgersync_core::{
    BankingEngine, CacheChannel, SchedulerAdapter, StatusChannel, SyncError, SyncStep, SyncStorage,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::balance::apply_balance;
use crate::batch::process_batch;
use crate::cache::invalidate_team;
use crate::runlock::RunLocks;
use crate::schedule::ensure_schedule;
use crate::transform::transform_batch;

/// Summary of one completed sync run.
#[derive(Debug)]
pub struct SyncReport {
    pub team_id: TeamId,
    pub accounts_total: usize,
    pub accounts_failed: usize,
    /// Transactions actually inserted (duplicates skipped by the upsert
    /// are not counted).
    pub transactions_written: usize,
    /// Raw records dropped by the transformer as structurally invalid.
    pub records_skipped: usize,
    /// Per-account errors from accounts that failed, keyed by internal
    /// account id. Non-empty only under the best-effort failure policy.
    pub failures: Vec<(String, SyncError)>,
}

struct AccountOutcome {
    account_id: String,
    connection_id: String,
    written: usize,
    skipped: usize,
    result: Result<(), SyncError>,
}

/// The per-team sync driver. All collaborators are injected as trait
/// objects; the orchestrator owns no I/O of its own.
pub struct SyncOrchestrator {
    engine: Arc<dyn BankingEngine>,
    storage: Arc<dyn SyncStorage>,
    scheduler: Arc<dyn SchedulerAdapter>,
    cache: Arc<dyn CacheChannel>,
    status: Arc<dyn StatusChannel>,
    config: SyncConfig,
    locks: RunLocks,
}

impl SyncOrchestrator {
    pub fn new(
        engine: Arc<dyn BankingEngine>,
        storage: Arc<dyn SyncStorage>,
        scheduler: Arc<dyn SchedulerAdapter>,
        cache: Arc<dyn CacheChannel>,
        status: Arc<dyn StatusChannel>,
        config: SyncConfig,
    ) -> Self {
        Self {
            engine,
            storage,
            scheduler,
            cache,
            status,
            config,
            locks: RunLocks::new(),
        }
    }

    /// Runs one full sync pass for a team.
    ///
    /// Fails immediately with [`SyncError::RunInProgress`] when another
    /// run for the same team is in flight. Cancellation lets in-flight
    /// chunk writes complete but starts no new chunks or accounts.
    pub async fn sync_team(
        &self,
        team_id: &TeamId,
        cancel: &CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let _run = self.locks.acquire(team_id)?;
        info!(team = %team_id, "starting sync run");

        self.publish_step(team_id, SyncStep::ConnectingBank).await;
        ensure_schedule(
            self.scheduler.as_ref(),
            team_id,
            self.config.schedule_interval_seconds,
        )
        .await;

        let accounts = match self.storage.list_enabled_accounts(team_id).await {
            Ok(accounts) => accounts,
            Err(e) => {
                self.publish_step(team_id, SyncStep::Failed).await;
                return Err(e);
            }
        };

        self.publish_step(team_id, SyncStep::GettingTransactions).await;

        let outcomes = self.fan_out(team_id, accounts, cancel).await?;

        // Touch each connection once after the fan-out settles, for
        // connections with at least one successful account.
        let touched: HashSet<&str> = outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.connection_id.as_str())
            .collect();
        for connection_id in touched {
            if let Err(e) = self.storage.touch_connection(connection_id).await {
                warn!(connection = connection_id, error = %e, "failed to refresh connection timestamp");
            }
        }

        // Invalidation fires unconditionally once the fan-out settles, so
        // partially synced data is visible even when the run fails.
        invalidate_team(self.cache.as_ref(), team_id).await;

        let result = self.settle(team_id, outcomes);
        let terminal = if result.is_ok() {
            SyncStep::Completed
        } else {
            SyncStep::Failed
        };
        self.publish_step(team_id, terminal).await;
        result
    }

    async fn fan_out(
        &self,
        team_id: &TeamId,
        accounts: Vec<EnabledAccount>,
        cancel: &CancellationToken,
    ) -> Result<Vec<AccountOutcome>, SyncError> {
        let semaphore = Arc::new(Semaphore::new(self.config.fan_out_limit));
        let mut tasks = JoinSet::new();
        let mut outcomes = Vec::new();

        for item in accounts {
            if cancel.is_cancelled() {
                outcomes.push(AccountOutcome {
                    account_id: item.account.id.clone(),
                    connection_id: item.connection.id.clone(),
                    written: 0,
                    skipped: 0,
                    result: Err(SyncError::Internal(
                        "run cancelled before account sync started".into(),
                    )),
                });
                continue;
            }
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| SyncError::Internal(format!("fan-out semaphore closed: {e}")))?;
            let engine = Arc::clone(&self.engine);
            let storage = Arc::clone(&self.storage);
            let team = team_id.clone();
            let batch_limit = self.config.batch_limit;
            let token = cancel.clone();
            tasks.spawn(async move {
                let _permit = permit;
                sync_account(engine, storage, team, item, batch_limit, token).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => outcomes.push(AccountOutcome {
                    account_id: "<unknown>".into(),
                    connection_id: String::new(),
                    written: 0,
                    skipped: 0,
                    result: Err(SyncError::Internal(format!("account task panicked: {e}"))),
                }),
            }
        }

        Ok(outcomes)
    }

    fn settle(
        &self,
        team_id: &TeamId,
        outcomes: Vec<AccountOutcome>,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            team_id: team_id.clone(),
            accounts_total: outcomes.len(),
            accounts_failed: 0,
            transactions_written: 0,
            records_skipped: 0,
            failures: Vec::new(),
        };
        for outcome in outcomes {
            report.transactions_written += outcome.written;
            report.records_skipped += outcome.skipped;
            if let Err(e) = outcome.result {
                report.accounts_failed += 1;
                report.failures.push((outcome.account_id, e));
            }
        }

        let run_failed = match self.config.failure_policy {
            FailurePolicy::AnyFailed => report.accounts_failed > 0,
            FailurePolicy::AllFailed => {
                report.accounts_total > 0 && report.accounts_failed == report.accounts_total
            }
        };

        if run_failed {
            let (account, source) = report.failures.swap_remove(0);
            error!(
                team = %team_id,
                failed = report.accounts_failed,
                total = report.accounts_total,
                account = %account,
                error = %source,
                "sync run failed"
            );
            return Err(SyncError::Aggregate {
                failed: report.accounts_failed,
                total: report.accounts_total,
                source: Box::new(source),
            });
        }

        for (account, e) in &report.failures {
            warn!(team = %team_id, account = %account, error = %e, "account sync failed, run continuing");
        }
        info!(
            team = %team_id,
            accounts = report.accounts_total,
            written = report.transactions_written,
            skipped = report.records_skipped,
            "sync run completed"
        );
        Ok(report)
    }

    async fn publish_step(&self, team_id: &TeamId, step: SyncStep) {
        if let Err(e) = self.status.update(team_id, step).await {
            warn!(team = %team_id, step = %step, error = %e, "status update failed");
        }
    }
}

async fn sync_account(
    engine: Arc<dyn BankingEngine>,
    storage: Arc<dyn SyncStorage>,
    team_id: TeamId,
    item: EnabledAccount,
    batch_limit: usize,
    cancel: CancellationToken,
) -> AccountOutcome {
    let account_id = item.account.id.clone();
    let connection_id = item.connection.id.clone();
    let mut written = 0;
    let mut skipped = 0;

    let result = async {
        let raws = engine
            .list_transactions(
                &item.connection.provider,
                &item.account.account_id,
                item.account.account_type,
            )
            .await?;

        let (transactions, failures) = transform_batch(&raws, &team_id, &item.account.id);
        skipped = failures.len();
        for e in &failures {
            warn!(account = %item.account.id, error = %e, "skipping malformed raw transaction");
        }

        written = process_batch(transactions, batch_limit, |chunk| {
            let storage = Arc::clone(&storage);
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return Err(SyncError::Internal("run cancelled mid-account".into()));
                }
                storage.upsert_transactions(&chunk).await
            }
        })
        .await?;

        // Balance updates only after every transaction chunk for this
        // account has been written.
        let balance = engine
            .balance(
                &item.connection.provider,
                &item.account.account_id,
                &item.connection.access_token,
            )
            .await?;
        apply_balance(storage.as_ref(), &item.account.id, &balance).await?;
        Ok(())
    }
    .await;

    AccountOutcome {
        account_id,
        connection_id,
        written,
        skipped,
        result,
    }
}
