// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the ledgersync service.
//!
//! This crate provides the foundational trait definitions, error type,
//! and domain types used throughout the ledgersync workspace. All
//! external collaborators (banking engine, storage, scheduler, cache,
//! status channel) are reached through traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SyncError;
pub use types::{AdapterType, CacheTag, HealthStatus, SyncStep, TeamId};

// Re-export all adapter traits at crate root.
pub use traits::{
    BankingEngine, CacheChannel, SchedulerAdapter, ServiceAdapter, StatusChannel, SyncStorage,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_error_has_all_variants() {
        let _config = SyncError::Config("test".into());
        let _storage = SyncError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _engine = SyncError::Engine {
            message: "test".into(),
            source: None,
        };
        let _transform = SyncError::Transform {
            message: "test".into(),
        };
        let _scheduling = SyncError::Scheduling {
            message: "test".into(),
            source: None,
        };
        let _cache = SyncError::Cache {
            message: "test".into(),
        };
        let _running = SyncError::RunInProgress {
            team_id: "test".into(),
        };
        let _aggregate = SyncError::Aggregate {
            failed: 1,
            total: 1,
            source: Box::new(SyncError::Internal("test".into())),
        };
        let _timeout = SyncError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = SyncError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Engine,
            AdapterType::Storage,
            AdapterType::Scheduler,
            AdapterType::Cache,
            AdapterType::Status,
        ];
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies the five adapter traits compile and are reachable
        // through the public API.
        fn _assert_service_adapter<T: ServiceAdapter>() {}
        fn _assert_engine<T: BankingEngine>() {}
        fn _assert_storage<T: SyncStorage>() {}
        fn _assert_scheduler<T: SchedulerAdapter>() {}
        fn _assert_cache<T: CacheChannel>() {}
        fn _assert_status<T: StatusChannel>() {}
    }
}
