use crate::{Result, WsError};

use serde::Deserialize;
use serde_json::value::RawValue;

/// Control frame kinds accepted from clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    JoinRoom,
    LeaveRoom,
    Broadcast,
}

/// Inbound control frame: `{ "type": ..., "room": ..., "data": ... }`.
///
/// `data` stays unparsed; the hub forwards it byte-for-byte.
#[derive(Debug, Deserialize)]
pub struct ClientFrame {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl ClientFrame {
    /// Decode a text or binary frame body
    #[track_caller]
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let frame: ClientFrame = serde_json::from_slice(raw)
            .map_err(|e| WsError::invalid_message(format!("malformed control frame: {e}")))?;

        if frame.kind != FrameKind::Broadcast && frame.room.is_empty() {
            return Err(WsError::invalid_message(
                "join_room/leave_room require a non-empty room",
            ));
        }

        Ok(frame)
    }
}
