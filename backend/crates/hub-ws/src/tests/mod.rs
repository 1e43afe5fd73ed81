mod broadcast_envelope;

use crate::{ClientHandle, ConnectionId, ConnectionStatus, Hub};

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use axum::extract::ws::{Message, Utf8Bytes};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use futures::{Sink, Stream, StreamExt};
use tokio::sync::mpsc;

/// A registered connection without a socket: the test reads its queue directly
pub(crate) struct TestClient {
    pub(crate) id: ConnectionId,
    pub(crate) queue: mpsc::Receiver<Utf8Bytes>,
    pub(crate) status: Arc<ConnectionStatus>,
}

impl TestClient {
    /// Drain whatever is queued right now
    pub(crate) fn drain(&mut self) -> Vec<Utf8Bytes> {
        let mut received = Vec::new();
        while let Ok(payload) = self.queue.try_recv() {
            received.push(payload);
        }
        received
    }
}

pub(crate) async fn register_client(hub: &Hub, buffer: usize) -> TestClient {
    let id = ConnectionId::new();
    let (sender, queue) = mpsc::channel(buffer);
    let status = Arc::new(ConnectionStatus::new());

    hub.register(ClientHandle::new(id, sender, Arc::clone(&status)))
        .await
        .expect("hub should be running");

    TestClient { id, queue, status }
}

/// What a mock socket has seen on its write side
#[derive(Clone, Default)]
pub(crate) struct SocketLog {
    pub(crate) written: Arc<Mutex<Vec<Message>>>,
    pub(crate) flushes: Arc<AtomicUsize>,
    pub(crate) closed: Arc<AtomicUsize>,
}

impl SocketLog {
    pub(crate) fn texts(&self) -> Vec<String> {
        self.written
            .lock()
            .unwrap()
            .iter()
            .filter_map(|message| match message {
                Message::Text(text) => Some(text.as_str().to_string()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn pings(&self) -> usize {
        self.written
            .lock()
            .unwrap()
            .iter()
            .filter(|message| matches!(message, Message::Ping(_)))
            .count()
    }

    pub(crate) fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

/// In-memory socket: frames pushed into the returned sender are read by the
/// connection, frames the connection writes land in the `SocketLog`
pub(crate) struct MockSocket {
    incoming: UnboundedReceiver<Result<Message, Infallible>>,
    log: SocketLog,
}

impl MockSocket {
    pub(crate) fn new() -> (Self, UnboundedSender<Result<Message, Infallible>>, SocketLog) {
        let (tx, incoming) = unbounded();
        let log = SocketLog::default();
        let socket = Self {
            incoming,
            log: log.clone(),
        };
        (socket, tx, log)
    }
}

impl Stream for MockSocket {
    type Item = Result<Message, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.incoming.poll_next_unpin(cx)
    }
}

impl Sink<Message> for MockSocket {
    type Error = Infallible;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), Self::Error> {
        self.log.written.lock().unwrap().push(item);
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.log.flushes.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

pub(crate) fn text_frame(json: &str) -> Result<Message, Infallible> {
    Ok(Message::Text(Utf8Bytes::from(json.to_string())))
}
