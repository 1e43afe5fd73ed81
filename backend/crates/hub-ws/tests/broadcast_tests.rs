mod common;

use common::test_client::connect_clients;
use common::test_server::{
    TestServerConfig, create_test_server, create_test_server_with_config, wait_for_connections,
    wait_for_members,
};

use hub_ws::{BroadcastEnvelope, BroadcastOutcome};

use std::time::Duration;

use serde_json::json;

#[tokio::test]
async fn given_application_broadcast_when_room_targeted_then_members_receive() {
    // Given
    let server = create_test_server();
    let hub = &server.app_state.hub;
    let mut clients = connect_clients(&server.server, 3).await;
    clients[0].join("deploys").await;
    clients[1].join("deploys").await;
    wait_for_members(hub, "deploys", 2).await;

    // When
    let envelope =
        BroadcastEnvelope::from_data("deploys", "deploy_finished", &json!({"id": 42})).unwrap();
    hub.broadcast(envelope).await;

    // Then
    for client in clients.iter_mut().take(2) {
        let envelope = client.receive_envelope().await;
        assert_eq!(envelope["type"], "deploy_finished");
        assert_eq!(envelope["data"]["id"], 42);
    }
    assert!(clients[2].receives_nothing_within(Duration::from_millis(200)).await);
}

#[tokio::test]
async fn given_global_broadcast_when_sent_then_every_connection_receives() {
    let server = create_test_server();
    let hub = &server.app_state.hub;
    let mut clients = connect_clients(&server.server, 3).await;
    wait_for_connections(hub, 3).await;

    let outcome = hub
        .broadcast_with_report(BroadcastEnvelope::new("", "maintenance", None))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        BroadcastOutcome::Delivered {
            delivered: 3,
            dropped: 0
        }
    );
    for client in &mut clients {
        assert_eq!(client.receive_envelope().await["type"], "maintenance");
    }
    assert_eq!(hub.recent(10).len(), 1);
}

#[tokio::test]
async fn given_single_global_token_when_two_broadcasts_then_second_shed() {
    // Given
    let server = create_test_server_with_config(TestServerConfig::with_single_global_token());
    let hub = &server.app_state.hub;
    let mut clients = connect_clients(&server.server, 2).await;
    for client in &mut clients {
        client.join("alerts").await;
    }
    wait_for_members(hub, "alerts", 2).await;

    // When
    clients[0].broadcast("alerts", json!("first")).await;
    let _ = clients[1].receive_envelope().await;
    clients[0].broadcast("alerts", json!("second")).await;

    // Then
    assert!(clients[1].receives_nothing_within(Duration::from_millis(300)).await);
    assert_eq!(server.app_state.metrics.snapshot().broadcasts_rate_limited, 1);
}
