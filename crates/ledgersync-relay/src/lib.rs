// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay adapter: HTTP delivery of schedules, cache invalidations, and
//! run-status updates to the job platform.

pub mod client;

pub use client::RelayClient;
