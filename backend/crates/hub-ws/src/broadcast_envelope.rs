use crate::{ConnectionId, OutboundEnvelope, Result};

use std::collections::HashSet;

use axum::extract::ws::Utf8Bytes;
use serde::Serialize;
use serde_json::value::RawValue;

/// Message type used for broadcasts originating from a client frame
pub const CLIENT_BROADCAST_TYPE: &str = "broadcast";

/// One unit of broadcast work
#[derive(Debug, Clone)]
pub struct BroadcastEnvelope {
    /// Target room; empty means every registered connection
    pub room: String,
    /// Type tag copied into the outbound envelope
    pub message_type: String,
    /// Opaque JSON payload
    pub data: Option<Box<RawValue>>,
    /// Connections that must not receive this message
    pub excluded: HashSet<ConnectionId>,
}

impl BroadcastEnvelope {
    pub fn new(
        room: impl Into<String>,
        message_type: impl Into<String>,
        data: Option<Box<RawValue>>,
    ) -> Self {
        Self {
            room: room.into(),
            message_type: message_type.into(),
            data,
            excluded: HashSet::new(),
        }
    }

    /// Build an envelope from any serializable payload
    #[track_caller]
    pub fn from_data<T: Serialize + ?Sized>(
        room: impl Into<String>,
        message_type: impl Into<String>,
        data: &T,
    ) -> Result<Self> {
        let raw = serde_json::value::to_raw_value(data)?;
        Ok(Self::new(room, message_type, Some(raw)))
    }

    /// Skip one connection (typically the sender)
    pub fn excluding(mut self, connection_id: ConnectionId) -> Self {
        self.excluded.insert(connection_id);
        self
    }

    /// True when the broadcast goes to every connection
    pub fn is_global(&self) -> bool {
        self.room.is_empty()
    }

    /// Serialize the wire envelope once; the result is shared by every target
    #[track_caller]
    pub fn to_wire(&self, timestamp: i64) -> Result<Utf8Bytes> {
        let envelope = OutboundEnvelope {
            message_type: &self.message_type,
            data: self.data.as_deref(),
            timestamp,
        };
        Ok(Utf8Bytes::from(serde_json::to_string(&envelope)?))
    }
}
