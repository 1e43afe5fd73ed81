mod common;

use common::test_client::WsTestClient;
use common::test_server::{create_test_server, wait_for_connections, wait_for_members};

use std::time::Duration;

use serde_json::json;

#[tokio::test]
async fn given_two_members_when_one_broadcasts_then_only_the_other_receives() {
    // Given
    let server = create_test_server();
    let hub = &server.app_state.hub;
    let mut a = WsTestClient::connect(&server.server).await;
    let mut b = WsTestClient::connect(&server.server).await;
    a.join("alerts").await;
    b.join("alerts").await;
    wait_for_members(hub, "alerts", 2).await;

    // When
    a.broadcast("alerts", json!({"msg": "fire"})).await;

    // Then
    let envelope = b.receive_envelope().await;
    assert_eq!(envelope["type"], "broadcast");
    assert_eq!(envelope["data"], json!({"msg": "fire"}));
    assert!(envelope["timestamp"].is_i64());

    assert!(b.receives_nothing_within(Duration::from_millis(200)).await);
    assert!(a.receives_nothing_within(Duration::from_millis(200)).await);

    a.close().await;
    b.close().await;
}

#[tokio::test]
async fn given_member_leaves_when_room_broadcast_then_not_delivered() {
    // Given
    let server = create_test_server();
    let hub = &server.app_state.hub;
    let mut sender = WsTestClient::connect(&server.server).await;
    let mut leaver = WsTestClient::connect(&server.server).await;
    sender.join("alerts").await;
    leaver.join("alerts").await;
    wait_for_members(hub, "alerts", 2).await;

    // When
    leaver.leave("alerts").await;
    wait_for_members(hub, "alerts", 1).await;
    sender.broadcast("alerts", json!(1)).await;

    // Then
    assert!(leaver.receives_nothing_within(Duration::from_millis(200)).await);

    sender.close().await;
    leaver.close().await;
}

#[tokio::test]
async fn given_member_disconnects_when_server_notices_then_rooms_cleaned_up() {
    // Given
    let server = create_test_server();
    let hub = &server.app_state.hub;
    let mut client = WsTestClient::connect(&server.server).await;
    client.join("alerts").await;
    wait_for_members(hub, "alerts", 1).await;

    // When
    client.close().await;

    // Then
    wait_for_connections(hub, 0).await;
    let stats = hub.stats().await.unwrap();
    assert_eq!(stats.rooms, 0);
}
