use crate::{BroadcastEnvelope, BroadcastOutcome, ClientHandle, ConnectionId, HubStats};

use tokio::sync::oneshot;

/// Everything the coordinator processes, one at a time
pub(crate) enum HubCommand {
    Register(ClientHandle),
    Unregister(ConnectionId),
    JoinRoom {
        connection_id: ConnectionId,
        room: String,
    },
    LeaveRoom {
        connection_id: ConnectionId,
        room: String,
    },
    Broadcast {
        envelope: BroadcastEnvelope,
        reply: Option<oneshot::Sender<BroadcastOutcome>>,
    },
    Stats(oneshot::Sender<HubStats>),
    RoomMembers {
        room: String,
        reply: oneshot::Sender<Vec<ConnectionId>>,
    },
    JoinedRooms {
        connection_id: ConnectionId,
        reply: oneshot::Sender<Option<Vec<String>>>,
    },
}
