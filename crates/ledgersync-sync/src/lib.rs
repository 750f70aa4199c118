// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sync orchestration core: transforms provider transactions, writes
//! them in idempotent ordered batches, updates balances, and signals
//! completion through cache invalidation and run status.

pub mod balance;
pub mod batch;
pub mod cache;
pub mod orchestrator;
pub mod runlock;
pub mod schedule;
pub mod transform;

pub use orchestrator::{SyncOrchestrator, SyncReport};
pub use runlock::RunLocks;
