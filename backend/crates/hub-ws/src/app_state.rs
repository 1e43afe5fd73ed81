use crate::{Connection, ConnectionConfig, ConnectionId, Hub, Metrics, ShutdownCoordinator};

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use log::{debug, error, warn};

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: Hub,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// WebSocket upgrade handler.
///
/// Callers are expected to sit behind whatever authentication the deployment uses;
/// every socket that reaches this point is accepted.
pub async fn handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    if state.shutdown.is_shutdown() {
        warn!("Rejecting WebSocket upgrade during shutdown");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let connection_id = ConnectionId::new();
    debug!("WebSocket upgrade accepted as {connection_id}");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, connection_id, state)))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(socket: WebSocket, connection_id: ConnectionId, state: AppState) {
    let connection = Connection::new(connection_id, state.config, state.hub, state.metrics);

    if let Err(e) = connection.run(socket).await {
        error!("Connection {connection_id} error: {e}");
    }
}
