use crate::hub_command::HubCommand;
use crate::hub_coordinator::HubCoordinator;
use crate::{
    BroadcastEnvelope, BroadcastOutcome, ClientHandle, ConnectionId, GlobalRateLimiter, HubConfig,
    HubStats, Metrics, Result, RingBuffer, ShutdownCoordinator, WsError,
};

use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use log::{debug, info};
use tokio::sync::{mpsc, oneshot};

/// Handle to the hub coordinator.
///
/// Cloning is cheap. Every mutation of the registry or room index is sent to
/// the coordinator task and applied there in arrival order, so two calls made
/// from the same task are applied in the order they were made.
#[derive(Clone)]
pub struct Hub {
    commands: mpsc::Sender<HubCommand>,
    replay: Arc<RingBuffer<Utf8Bytes>>,
    limiter: Arc<GlobalRateLimiter>,
}

impl Hub {
    /// Spawn the coordinator and the global limiter's refill ticker.
    /// Must be called from within a tokio runtime.
    pub fn start(config: HubConfig, metrics: Metrics, shutdown: &ShutdownCoordinator) -> Self {
        let (commands, receiver) = mpsc::channel(config.command_buffer_size.max(1));
        let replay = Arc::new(RingBuffer::new(config.replay_capacity));
        let limiter = Arc::new(GlobalRateLimiter::new(config.global_rate_limit));

        limiter.spawn_refill(shutdown.subscribe_guard());

        let coordinator = HubCoordinator::new(
            config,
            Arc::clone(&limiter),
            Arc::clone(&replay),
            metrics,
        );
        tokio::spawn(coordinator.run(receiver, shutdown.subscribe_guard()));

        info!("Hub coordinator started");

        Self {
            commands,
            replay,
            limiter,
        }
    }

    /// Add a connection to the registry
    pub async fn register(&self, handle: ClientHandle) -> Result<()> {
        self.send(HubCommand::Register(handle)).await
    }

    /// Remove a connection from the registry and all of its rooms.
    /// Safe to call any number of times.
    pub async fn unregister(&self, connection_id: ConnectionId) {
        if self.send(HubCommand::Unregister(connection_id)).await.is_err() {
            debug!("Hub stopped before unregistering {connection_id}");
        }
    }

    pub async fn join_room(&self, connection_id: ConnectionId, room: impl Into<String>) {
        let command = HubCommand::JoinRoom {
            connection_id,
            room: room.into(),
        };
        if self.send(command).await.is_err() {
            debug!("Hub stopped, join from {connection_id} ignored");
        }
    }

    pub async fn leave_room(&self, connection_id: ConnectionId, room: impl Into<String>) {
        let command = HubCommand::LeaveRoom {
            connection_id,
            room: room.into(),
        };
        if self.send(command).await.is_err() {
            debug!("Hub stopped, leave from {connection_id} ignored");
        }
    }

    /// Queue a broadcast without waiting for delivery
    pub async fn broadcast(&self, envelope: BroadcastEnvelope) {
        let command = HubCommand::Broadcast {
            envelope,
            reply: None,
        };
        if self.send(command).await.is_err() {
            debug!("Hub stopped, broadcast discarded");
        }
    }

    /// Queue a broadcast and wait until the coordinator has fanned it out
    pub async fn broadcast_with_report(&self, envelope: BroadcastEnvelope) -> Result<BroadcastOutcome> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Broadcast {
            envelope,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| WsError::hub_stopped())
    }

    pub async fn stats(&self) -> Result<HubStats> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Stats(reply)).await?;
        rx.await.map_err(|_| WsError::hub_stopped())
    }

    /// Current members of a room (empty if the room does not exist)
    pub async fn room_members(&self, room: impl Into<String>) -> Result<Vec<ConnectionId>> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::RoomMembers {
            room: room.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| WsError::hub_stopped())
    }

    /// Rooms a connection has joined, or None if it is not registered
    pub async fn joined_rooms(&self, connection_id: ConnectionId) -> Result<Option<Vec<String>>> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::JoinedRooms {
            connection_id,
            reply,
        })
        .await?;
        rx.await.map_err(|_| WsError::hub_stopped())
    }

    /// Up to `n` most recently broadcast envelopes, oldest first
    pub fn recent(&self, n: usize) -> Vec<Utf8Bytes> {
        self.replay.recent(n)
    }

    /// Tokens left in the global limiter
    pub fn global_tokens(&self) -> u32 {
        self.limiter.available()
    }

    async fn send(&self, command: HubCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| WsError::hub_stopped())
    }
}
