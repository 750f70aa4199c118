// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system: layered loading,
//! strict key checking, validation, and diagnostic conversion.

use ledgersync_config::model::FailurePolicy;
use ledgersync_config::{ConfigError, load_and_validate_str};

#[test]
fn full_config_round_trip() {
    let config = load_and_validate_str(
        r#"
        [service]
        name = "ledgersync-staging"
        log_level = "debug"

        [engine]
        base_url = "https://engine.staging.internal"
        api_key = "test-key"
        timeout_seconds = 15

        [storage]
        database_path = "/var/lib/ledgersync/sync.db"

        [relay]
        base_url = "https://jobs.staging.internal"
        token = "relay-token"

        [sync]
        batch_limit = 500
        fan_out_limit = 4
        schedule_interval_seconds = 3600
        failure_policy = "all-failed"
        "#,
    )
    .expect("config should load");

    assert_eq!(config.service.name, "ledgersync-staging");
    assert_eq!(config.engine.api_key.as_deref(), Some("test-key"));
    assert_eq!(config.storage.database_path, "/var/lib/ledgersync/sync.db");
    assert_eq!(config.sync.batch_limit, 500);
    assert_eq!(config.sync.failure_policy, FailurePolicy::AllFailed);
}

#[test]
fn partial_config_keeps_defaults() {
    let config = load_and_validate_str(
        r#"
        [sync]
        fan_out_limit = 2
        "#,
    )
    .expect("config should load");

    assert_eq!(config.sync.fan_out_limit, 2);
    assert_eq!(config.sync.batch_limit, 300);
    assert_eq!(config.sync.schedule_interval_seconds, 28_800);
    assert_eq!(config.service.log_level, "info");
}

#[test]
fn unknown_key_gets_suggestion() {
    let errors = load_and_validate_str(
        r#"
        [sync]
        batch_limt = 100
        "#,
    )
    .unwrap_err();

    let ConfigError::UnknownKey { key, suggestion, .. } = &errors[0] else {
        panic!("expected UnknownKey, got {:?}", errors[0]);
    };
    assert!(key.contains("batch_limt"));
    assert_eq!(suggestion.as_deref(), Some("batch_limit"));
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str(
        r#"
        [scheduler]
        interval = 10
        "#,
    )
    .unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn invalid_failure_policy_is_rejected() {
    let result = load_and_validate_str(
        r#"
        [sync]
        failure_policy = "sometimes"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn semantic_validation_runs_after_parse() {
    let errors = load_and_validate_str(
        r#"
        [sync]
        batch_limit = 0
        "#,
    )
    .unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn wrong_type_reports_invalid_type() {
    let errors = load_and_validate_str(
        r#"
        [sync]
        batch_limit = "lots"
        "#,
    )
    .unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Parse { .. }))
    );
}
