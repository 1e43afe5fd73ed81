use crate::write_pump::WritePump;
use crate::{
    BroadcastEnvelope, CLIENT_BROADCAST_TYPE, ClientFrame, ClientHandle, ConnectionConfig,
    ConnectionId, ConnectionState, ConnectionStatus, FrameKind, Hub, Metrics, Result, TokenBucket,
    WsError,
};

use std::fmt::Display;
use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::Message;
use error_location::ErrorLocation;
use futures::{Sink, Stream, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

/// One accepted client socket.
///
/// `run` drives the whole lifecycle: register with the hub, spawn the writer,
/// read until the peer goes away, then unregister. Either loop stopping moves
/// the shared status to `Closing`, which stops the other.
pub struct Connection {
    id: ConnectionId,
    config: ConnectionConfig,
    hub: Hub,
    metrics: Metrics,
    bucket: TokenBucket,
    status: Arc<ConnectionStatus>,
}

impl Connection {
    pub fn new(id: ConnectionId, config: ConnectionConfig, hub: Hub, metrics: Metrics) -> Self {
        let bucket = TokenBucket::new(config.rate_limit);
        Self {
            id,
            config,
            hub,
            metrics,
            bucket,
            status: Arc::new(ConnectionStatus::new()),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Shared lifecycle state; stays valid after `run` consumes the connection
    pub fn status(&self) -> Arc<ConnectionStatus> {
        Arc::clone(&self.status)
    }

    /// Serve the socket until either side closes.
    ///
    /// Returns the reason the reader stopped; the connection is unregistered
    /// and `Closed` either way.
    pub async fn run<S, E>(self, socket: S) -> Result<()>
    where
        S: Stream<Item = std::result::Result<Message, E>> + Sink<Message, Error = E> + Send + 'static,
        E: Display + Send + 'static,
    {
        let (sink, stream) = socket.split();
        let (sender, queue) = mpsc::channel(self.config.send_buffer_size.max(1));

        let handle = ClientHandle::new(self.id, sender, Arc::clone(&self.status));
        if let Err(e) = self.hub.register(handle).await {
            warn!("Connection {} rejected: {e}", self.id);
            self.status.transition(ConnectionState::Closed);
            return Err(e);
        }
        self.status.transition(ConnectionState::Registered);

        let writer = WritePump::new(
            self.id,
            sink,
            queue,
            Arc::clone(&self.status),
            self.hub.clone(),
            self.metrics.clone(),
            self.config.clone(),
        );
        let writer = tokio::spawn(writer.run());
        self.status.transition(ConnectionState::Active);
        info!("Connection {} active", self.id);

        let result = self.read_pump(stream).await;
        if let Err(e) = &result {
            warn!("Reader for connection {} stopped: {e}", self.id);
            self.metrics.error_occurred(e.error_code());
        }

        self.status.transition(ConnectionState::Closing);
        self.hub.unregister(self.id).await;
        if let Err(join_error) = writer.await {
            let e = WsError::Internal {
                message: format!("writer task failed: {join_error}"),
                location: ErrorLocation::from(Location::caller()),
            };
            error!("Connection {}: {e}", self.id);
            self.metrics.error_occurred(e.error_code());
        }

        self.status.transition(ConnectionState::Closed);
        info!("Connection {} closed", self.id);

        result
    }

    async fn read_pump<R, E>(&self, mut stream: R) -> Result<()>
    where
        R: Stream<Item = std::result::Result<Message, E>> + Unpin,
        E: Display,
    {
        let read_timeout = self.config.read_timeout;
        let mut deadline = Instant::now() + read_timeout;

        let closing = self.status.closing();
        tokio::pin!(closing);

        loop {
            let next = tokio::select! {
                next = timeout_at(deadline, stream.next()) => next,
                _ = &mut closing => {
                    debug!("Connection {} closing, reader exiting", self.id);
                    return Ok(());
                }
            };

            let message = match next {
                Err(_) => {
                    return Err(WsError::ReadTimeout {
                        timeout_secs: read_timeout.as_secs(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Ok(None) => {
                    info!("Connection {} closed by client", self.id);
                    return Ok(());
                }
                Ok(Some(Err(e))) => {
                    return Err(WsError::connection_closed(format!("socket read failed: {e}")));
                }
                Ok(Some(Ok(message))) => message,
            };

            match message {
                Message::Pong(_) => {
                    self.status.touch();
                    deadline = Instant::now() + read_timeout;
                }
                // Answered by the socket layer
                Message::Ping(_) => {}
                Message::Close(_) => {
                    info!("Received close frame from connection {}", self.id);
                    return Ok(());
                }
                Message::Text(text) => self.handle_frame(text.as_str().as_bytes()).await,
                Message::Binary(data) => self.handle_frame(&data).await,
            }
        }
    }

    /// Rate-limit, decode and dispatch one control frame. Bad frames are
    /// dropped without closing the connection.
    async fn handle_frame(&self, raw: &[u8]) {
        self.metrics.message_received(raw.len());

        if !self.bucket.allow() {
            debug!("Connection {} over its rate limit, frame dropped", self.id);
            self.metrics.frame_rate_limited();
            return;
        }

        let frame = match ClientFrame::parse(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping frame from connection {}: {e}", self.id);
                self.metrics.error_occurred(e.error_code());
                return;
            }
        };

        match frame.kind {
            FrameKind::JoinRoom => self.hub.join_room(self.id, frame.room).await,
            FrameKind::LeaveRoom => self.hub.leave_room(self.id, frame.room).await,
            FrameKind::Broadcast => {
                let envelope = BroadcastEnvelope::new(frame.room, CLIENT_BROADCAST_TYPE, frame.data)
                    .excluding(self.id);
                self.hub.broadcast(envelope).await;
            }
        }
    }
}
