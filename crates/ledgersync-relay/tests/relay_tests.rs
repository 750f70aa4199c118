// SPDX-FileCopyrightText: 2026 Ledgersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay client integration tests against a wiremock server.

use ledgersync_config::model::RelayConfig;
use ledgersync_core::types::{CacheTag, ScheduleSpec, SyncStep, TeamId};
use ledgersync_core::{CacheChannel, SchedulerAdapter, StatusChannel};
use ledgersync_relay::RelayClient;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RelayClient {
    let config = RelayConfig {
        base_url: "http://placeholder.invalid".to_string(),
        token: Some("test-token".to_string()),
        timeout_seconds: 5,
    };
    RelayClient::new(&config)
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn registers_schedule_as_put_upsert() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/schedules/T1"))
        .and(body_json(serde_json::json!({
            "kind": "interval",
            "seconds": 28_800,
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let team = TeamId::from("T1");
    let spec = ScheduleSpec { seconds: 28_800 };
    // Registering twice must hit the same keyed entry, never a create.
    client.register(&team, &spec).await.unwrap();
    client.register(&team, &spec).await.unwrap();
}

#[tokio::test]
async fn schedule_registration_failure_is_scheduling_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/schedules/T1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .register(&TeamId::from("T1"), &ScheduleSpec { seconds: 60 })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("schedule registration failed"));
}

#[tokio::test]
async fn invalidate_sends_team_scoped_tag_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/revalidate"))
        .and(body_json(serde_json::json!({"tag": "transactions_T1"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .invalidate(CacheTag::Transactions, &TeamId::from("T1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn status_update_publishes_snake_case_step() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs/T1/status"))
        .and(body_json(serde_json::json!({"step": "getting_transactions"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .update(&TeamId::from("T1"), SyncStep::GettingTransactions)
        .await
        .unwrap();
}
