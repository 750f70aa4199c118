// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Banking aggregation engine client for the ledgersync service.
//!
//! The engine is the external collaborator providing transaction and
//! balance retrieval across aggregation providers. This crate holds
//! the HTTP implementation of the [`ledgersync_core::BankingEngine`]
//! trait.

pub mod client;
pub mod types;

pub use client::EngineClient;
