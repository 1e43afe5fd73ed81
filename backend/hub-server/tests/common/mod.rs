#![allow(dead_code)]

use hub_server::build_router;
use hub_ws::{AppState, ConnectionConfig, Hub, HubConfig, Metrics, ShutdownCoordinator};

use axum_test::TestServer;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

/// Build the full router around a fresh hub.
/// The Prometheus recorder is built but never installed globally.
pub fn create_test_server() -> TestServerWithState {
    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();
    let hub = Hub::start(HubConfig::default(), metrics.clone(), &shutdown);

    let app_state = AppState {
        hub,
        metrics,
        shutdown,
        config: ConnectionConfig::default(),
    };

    let prometheus = PrometheusBuilder::new().build_recorder().handle();
    let server = TestServer::builder()
        .http_transport()
        .build(build_router(app_state.clone(), prometheus))
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}
