// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for ledgersync integration tests.
//!
//! Provides mock adapters and harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockEngine`] - Mock banking engine with per-account fixtures
//! - [`MockScheduler`] / [`MockCache`] / [`MockStatus`] - Signal-channel
//!   mocks with call capture
//! - [`SyncHarness`] - Temp-database environment builder

pub mod harness;
pub mod mock_engine;
pub mod mock_relay;

pub use harness::{SyncHarness, SyncHarnessBuilder, test_account, test_connection};
pub use mock_engine::MockEngine;
pub use mock_relay::{MockCache, MockScheduler, MockStatus};
