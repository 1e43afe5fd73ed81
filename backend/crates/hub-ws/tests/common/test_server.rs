#![allow(dead_code)]

use hub_ws::{
    AppState, ConnectionConfig, GlobalRateLimitConfig, Hub, HubConfig, Metrics,
    ShutdownCoordinator, TokenBucketConfig,
};

use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub client_capacity: u32,
    pub client_refill_per_sec: u32,
    pub global_capacity: u32,
    pub global_refill: u32,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            client_capacity: 100,
            client_refill_per_sec: 100,
            global_capacity: 1000,
            global_refill: 1000,
        }
    }
}

impl TestServerConfig {
    /// Create config with strict per-client limits (for rate limit tests)
    pub fn with_strict_client_limits() -> Self {
        Self {
            client_capacity: 3,
            client_refill_per_sec: 1,
            ..Default::default()
        }
    }

    /// Create config whose hub admits a single broadcast, ever
    pub fn with_single_global_token() -> Self {
        Self {
            global_capacity: 1,
            global_refill: 0,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

/// Create a TestServer with default configuration.
/// Must be called from within a tokio runtime.
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let metrics = Metrics::default();
    let shutdown = ShutdownCoordinator::new();

    let hub_config = HubConfig {
        global_rate_limit: GlobalRateLimitConfig {
            capacity: config.global_capacity,
            refill: config.global_refill,
            tick: Duration::from_millis(100),
        },
        ..HubConfig::default()
    };
    let hub = Hub::start(hub_config, metrics.clone(), &shutdown);

    let connection_config = ConnectionConfig {
        rate_limit: TokenBucketConfig {
            capacity: config.client_capacity,
            refill_per_sec: config.client_refill_per_sec,
        },
        ..ConnectionConfig::default()
    };

    let app_state = AppState {
        hub,
        metrics,
        shutdown,
        config: connection_config,
    };

    let router = Router::new()
        .route("/ws", get(hub_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}

/// Poll the hub until `room` has exactly `count` members
pub async fn wait_for_members(hub: &Hub, room: &str, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while hub.room_members(room).await.unwrap().len() != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("room membership never settled");
}

/// Poll the hub until it tracks exactly `count` connections
pub async fn wait_for_connections(hub: &Hub, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while hub.stats().await.unwrap().connections != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection count never settled");
}
