// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the ledgersync service.

use thiserror::Error;

/// The primary error type used across all ledgersync adapter traits and
/// the synchronization core.
///
/// Variants map onto the failure classes of a sync run: scheduling and
/// cache errors are non-fatal signals, engine and storage errors are
/// scoped to one account's work, and `Aggregate` is the terminal outcome
/// of a run whose per-account failures exceeded the configured policy.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Banking engine errors (provider outage, network failure, malformed response).
    /// Scoped to the account whose fetch failed.
    #[error("engine error: {message}")]
    Engine {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A raw transaction record could not be transformed. Scoped to the
    /// single record; carries enough context to attribute the failure.
    #[error("transform error: {message}")]
    Transform { message: String },

    /// Schedule registration failed. Non-fatal to the calling run.
    #[error("scheduling error: {message}")]
    Scheduling {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cache invalidation could not be delivered for a tag.
    #[error("cache error: {message}")]
    Cache { message: String },

    /// A sync run is already in flight for this team.
    #[error("sync already running for team {team_id}")]
    RunInProgress { team_id: String },

    /// The aggregate outcome of a run whose account failures crossed the
    /// failure-policy threshold. Carries one underlying account error.
    #[error("sync failed for {failed} of {total} accounts")]
    Aggregate {
        failed: usize,
        total: usize,
        #[source]
        source: Box<SyncError>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_carries_account_error_as_source() {
        let inner = SyncError::Engine {
            message: "provider unreachable".into(),
            source: None,
        };
        let err = SyncError::Aggregate {
            failed: 1,
            total: 3,
            source: Box::new(inner),
        };
        assert_eq!(err.to_string(), "sync failed for 1 of 3 accounts");
        let source = std::error::Error::source(&err).expect("aggregate should expose a source");
        assert!(source.to_string().contains("provider unreachable"));
    }

    #[test]
    fn run_in_progress_names_the_team() {
        let err = SyncError::RunInProgress {
            team_id: "team-1".into(),
        };
        assert!(err.to_string().contains("team-1"));
    }
}
