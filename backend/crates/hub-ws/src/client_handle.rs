use crate::{ConnectionId, ConnectionStatus};

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc;

/// The hub's view of one connection.
///
/// The hub holds the only sender of the outbound queue, so dropping the handle
/// closes the queue and ends the connection's writer.
pub struct ClientHandle {
    pub(crate) id: ConnectionId,
    pub(crate) sender: mpsc::Sender<Utf8Bytes>,
    pub(crate) status: Arc<ConnectionStatus>,
    pub(crate) rooms: HashSet<String>,
}

impl ClientHandle {
    pub fn new(
        id: ConnectionId,
        sender: mpsc::Sender<Utf8Bytes>,
        status: Arc<ConnectionStatus>,
    ) -> Self {
        Self {
            id,
            sender,
            status,
            rooms: HashSet::new(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }
}
