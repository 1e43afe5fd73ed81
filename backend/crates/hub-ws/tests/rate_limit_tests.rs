mod common;

use common::test_client::WsTestClient;
use common::test_server::{TestServerConfig, create_test_server_with_config, wait_for_members};

use std::time::Duration;

use serde_json::json;

#[tokio::test]
async fn given_strict_client_limit_when_burst_sent_then_excess_frames_dropped() {
    // Given: three frames per burst, one more per second
    let server = create_test_server_with_config(TestServerConfig::with_strict_client_limits());
    let hub = &server.app_state.hub;
    let mut listener = WsTestClient::connect(&server.server).await;
    let mut chatty = WsTestClient::connect(&server.server).await;
    listener.join("chat").await;
    chatty.join("chat").await;
    wait_for_members(hub, "chat", 2).await;

    // When: the join used one token, so only two of these get through
    for i in 0..6 {
        chatty.broadcast("chat", json!(i)).await;
    }

    // Then
    assert_eq!(listener.receive_envelope().await["data"], 0);
    assert_eq!(listener.receive_envelope().await["data"], 1);
    assert!(listener.receives_nothing_within(Duration::from_millis(300)).await);
    assert_eq!(server.app_state.metrics.snapshot().frames_rate_limited, 4);
}

#[tokio::test]
async fn given_limited_client_when_over_limit_then_connection_stays_open() {
    let server = create_test_server_with_config(TestServerConfig::with_strict_client_limits());
    let hub = &server.app_state.hub;
    let mut listener = WsTestClient::connect(&server.server).await;
    let mut chatty = WsTestClient::connect(&server.server).await;
    listener.join("chat").await;
    chatty.join("chat").await;
    wait_for_members(hub, "chat", 2).await;

    for i in 0..10 {
        chatty.broadcast("chat", json!(i)).await;
    }
    tokio::time::sleep(Duration::from_millis(1100)).await;
    while !listener.receives_nothing_within(Duration::from_millis(100)).await {}

    // Bucket refilled: the same connection can talk again
    chatty.broadcast("chat", json!("after")).await;
    assert_eq!(listener.receive_envelope().await["data"], "after");
}
