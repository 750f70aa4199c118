// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the ledgersync external collaborators.
//!
//! All adapters extend the [`ServiceAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod cache;
pub mod engine;
pub mod scheduler;
pub mod status;
pub mod storage;

// Re-export all traits at the traits module level for convenience.
pub use adapter::ServiceAdapter;
pub use cache::CacheChannel;
pub use engine::BankingEngine;
pub use scheduler::SchedulerAdapter;
pub use status::StatusChannel;
pub use storage::SyncStorage;
