// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ledgersync.toml` > `~/.config/ledgersync/ledgersync.toml`
//! > `/etc/ledgersync/ledgersync.toml` with environment variable overrides via
//! the `LEDGERSYNC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LedgersyncConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ledgersync/ledgersync.toml` (system-wide)
/// 3. `~/.config/ledgersync/ledgersync.toml` (user XDG config)
/// 4. `./ledgersync.toml` (local directory)
/// 5. `LEDGERSYNC_*` environment variables
pub fn load_config() -> Result<LedgersyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LedgersyncConfig::default()))
        .merge(Toml::file("/etc/ledgersync/ledgersync.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ledgersync/ledgersync.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ledgersync.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config injection.
pub fn load_config_from_str(toml_content: &str) -> Result<LedgersyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LedgersyncConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LedgersyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LedgersyncConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `LEDGERSYNC_SYNC_BATCH_LIMIT`
/// must map to `sync.batch_limit`, not `sync.batch.limit`.
fn env_provider() -> Env {
    Env::prefixed("LEDGERSYNC_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: LEDGERSYNC_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("engine_", "engine.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("relay_", "relay.", 1)
            .replacen("sync_", "sync.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_with_overrides() {
        let config = load_config_from_str(
            r#"
            [sync]
            batch_limit = 100
            failure_policy = "all-failed"

            [engine]
            base_url = "https://engine.internal"
            "#,
        )
        .unwrap();
        assert_eq!(config.sync.batch_limit, 100);
        assert_eq!(config.engine.base_url, "https://engine.internal");
        // Untouched sections keep their defaults.
        assert_eq!(config.sync.fan_out_limit, 8);
        assert_eq!(config.relay.timeout_seconds, 10);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.service.name, "ledgersync");
        assert_eq!(config.sync.schedule_interval_seconds, 28_800);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
            [sync]
            batch_limt = 100
            "#,
        );
        assert!(result.is_err(), "typo'd key should fail extraction");
    }
}
