use crate::{ConnectionConfig, ConnectionId, ConnectionState, ConnectionStatus, Hub, Metrics, Result, WsError};

use std::fmt::Display;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, Utf8Bytes};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{Sink, SinkExt};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};

/// Outbound half of a connection: drains the queue to the socket and keeps
/// the peer alive with periodic pings.
pub(crate) struct WritePump<K> {
    connection_id: ConnectionId,
    sink: K,
    queue: mpsc::Receiver<Utf8Bytes>,
    status: Arc<ConnectionStatus>,
    hub: Hub,
    metrics: Metrics,
    config: ConnectionConfig,
}

impl<K, E> WritePump<K>
where
    K: Sink<Message, Error = E> + Unpin,
    E: Display,
{
    pub(crate) fn new(
        connection_id: ConnectionId,
        sink: K,
        queue: mpsc::Receiver<Utf8Bytes>,
        status: Arc<ConnectionStatus>,
        hub: Hub,
        metrics: Metrics,
        config: ConnectionConfig,
    ) -> Self {
        Self {
            connection_id,
            sink,
            queue,
            status,
            hub,
            metrics,
            config,
        }
    }

    /// Run until the queue closes, the connection starts closing, or a write fails.
    /// Leaves the connection in `Closing` and unregistered.
    pub(crate) async fn run(mut self) {
        if let Err(e) = self.pump().await {
            warn!("Writer for connection {} stopped: {e}", self.connection_id);
            self.metrics.error_occurred(e.error_code());
        }

        self.status.transition(ConnectionState::Closing);
        self.hub.unregister(self.connection_id).await;

        // Whatever is still queued is discarded
        self.queue.close();
        match timeout(self.config.write_timeout, self.sink.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Close frame to {} failed: {e}", self.connection_id),
            Err(_) => debug!("Close frame to {} timed out", self.connection_id),
        }
    }

    async fn pump(&mut self) -> Result<()> {
        // interval_at panics on a zero period
        let period = self.config.ping_interval.max(Duration::from_millis(1));
        let mut keepalive = interval_at(Instant::now() + period, period);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let status = Arc::clone(&self.status);
        let closing = status.closing();
        tokio::pin!(closing);

        loop {
            tokio::select! {
                queued = self.queue.recv() => match queued {
                    Some(payload) => self.write_batch(payload).await?,
                    None => {
                        debug!("Outbound queue for {} closed", self.connection_id);
                        return Ok(());
                    }
                },
                _ = keepalive.tick() => self.write_ping().await?,
                _ = &mut closing => {
                    debug!("Connection {} closing, writer exiting", self.connection_id);
                    return Ok(());
                }
            }
        }
    }

    /// Write one message plus up to `max_coalesce` already-queued ones, then flush once
    async fn write_batch(&mut self, first: Utf8Bytes) -> Result<()> {
        self.feed(first).await?;

        for _ in 0..self.config.max_coalesce {
            match self.queue.try_recv() {
                Ok(next) => self.feed(next).await?,
                Err(_) => break,
            }
        }

        self.flush().await
    }

    async fn feed(&mut self, payload: Utf8Bytes) -> Result<()> {
        let bytes = payload.as_str().len();
        let write = self.sink.feed(Message::Text(payload));
        within(self.config.write_timeout, write).await?;
        self.metrics.message_sent(bytes);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        within(self.config.write_timeout, self.sink.flush()).await
    }

    async fn write_ping(&mut self) -> Result<()> {
        let write = self.sink.send(Message::Ping(Bytes::new()));
        within(self.config.write_timeout, write).await
    }
}

/// Apply the socket write deadline to one sink operation
async fn within<F, E>(limit: Duration, write: F) -> Result<()>
where
    F: Future<Output = std::result::Result<(), E>>,
    E: Display,
{
    match timeout(limit, write).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WsError::ConnectionClosed {
            reason: format!("socket write failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }),
        Err(_) => Err(WsError::WriteTimeout {
            timeout_secs: limit.as_secs(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
