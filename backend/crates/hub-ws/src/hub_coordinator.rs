use crate::hub_command::HubCommand;
use crate::{
    BroadcastEnvelope, BroadcastOutcome, ClientHandle, ConnectionId, ConnectionState,
    GlobalRateLimiter, HubConfig, HubStats, Metrics, RingBuffer, ShutdownGuard, WsError,
};

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Utf8Bytes;
use error_location::ErrorLocation;
use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio::sync::mpsc::{
    self,
    error::{SendTimeoutError, TrySendError},
};
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Single owner of the registry and room index.
///
/// Runs as one task; nothing else touches `clients` or `rooms`, which is what
/// keeps `room.members` and `client.rooms` in agreement without locks.
pub(crate) struct HubCoordinator {
    config: HubConfig,
    clients: HashMap<ConnectionId, ClientHandle>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
    limiter: Arc<GlobalRateLimiter>,
    replay: Arc<RingBuffer<Utf8Bytes>>,
    metrics: Metrics,
}

impl HubCoordinator {
    pub(crate) fn new(
        config: HubConfig,
        limiter: Arc<GlobalRateLimiter>,
        replay: Arc<RingBuffer<Utf8Bytes>>,
        metrics: Metrics,
    ) -> Self {
        Self {
            config,
            clients: HashMap::new(),
            rooms: HashMap::new(),
            limiter,
            replay,
            metrics,
        }
    }

    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<HubCommand>,
        mut shutdown: ShutdownGuard,
    ) {
        // interval_at panics on a zero period
        let period = self.config.sweep_interval.max(Duration::from_millis(1));
        let mut sweep = interval_at(Instant::now() + period, period);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => {
                        debug!("All hub handles dropped, coordinator exiting");
                        break;
                    }
                },
                _ = sweep.tick() => self.sweep_stale(),
                _ = shutdown.wait() => {
                    info!("Hub coordinator shutting down");
                    break;
                }
            }
        }

        self.drain(&mut commands);
        self.close_all();
    }

    /// Apply membership commands that were queued before the loop exited, so
    /// every handle a caller saw accepted is closed by `close_all`. Pending
    /// replies are dropped, which callers observe as `HubStopped`.
    fn drain(&mut self, commands: &mut mpsc::Receiver<HubCommand>) {
        commands.close();

        while let Ok(command) = commands.try_recv() {
            match command {
                HubCommand::Register(handle) => self.register(handle),
                HubCommand::Unregister(connection_id) => self.unregister(connection_id, "closed"),
                _ => {}
            }
        }
    }

    async fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(handle) => self.register(handle),
            HubCommand::Unregister(connection_id) => self.unregister(connection_id, "closed"),
            HubCommand::JoinRoom {
                connection_id,
                room,
            } => self.join_room(connection_id, room),
            HubCommand::LeaveRoom {
                connection_id,
                room,
            } => self.leave_room(connection_id, &room),
            HubCommand::Broadcast { envelope, reply } => {
                let outcome = self.broadcast(envelope).await;
                if let Some(reply) = reply {
                    let _ = reply.send(outcome);
                }
            }
            HubCommand::Stats(reply) => {
                let _ = reply.send(self.stats());
            }
            HubCommand::RoomMembers { room, reply } => {
                let members = self
                    .rooms
                    .get(&room)
                    .map(|members| members.iter().copied().collect())
                    .unwrap_or_default();
                let _ = reply.send(members);
            }
            HubCommand::JoinedRooms {
                connection_id,
                reply,
            } => {
                let rooms = self
                    .clients
                    .get(&connection_id)
                    .map(|client| client.rooms.iter().cloned().collect());
                let _ = reply.send(rooms);
            }
        }
    }

    fn register(&mut self, handle: ClientHandle) {
        let connection_id = handle.id();

        if let Some(previous) = self.clients.insert(connection_id, handle) {
            // Caller guarantees unique IDs; treat a repeat as a replacement
            warn!("Connection {connection_id} registered twice, replacing previous handle");
            self.drop_memberships(connection_id, &previous.rooms);
            previous.status.transition(ConnectionState::Closing);
            return;
        }

        self.metrics.connection_registered();
        info!(
            "Registered connection {connection_id} ({} total)",
            self.clients.len()
        );
    }

    fn unregister(&mut self, connection_id: ConnectionId, reason: &'static str) {
        let Some(handle) = self.clients.remove(&connection_id) else {
            debug!("Connection {connection_id} already unregistered");
            return;
        };

        self.drop_memberships(connection_id, &handle.rooms);
        handle.status.transition(ConnectionState::Closing);
        self.metrics.connection_unregistered(reason);
        self.metrics.rooms_active(self.rooms.len());

        info!(
            "Unregistered connection {connection_id} ({reason}, {} remaining)",
            self.clients.len()
        );
        // Dropping the handle drops the queue's only sender
    }

    fn drop_memberships(&mut self, connection_id: ConnectionId, rooms: &HashSet<String>) {
        for room in rooms {
            if let Some(members) = self.rooms.get_mut(room) {
                members.remove(&connection_id);
                if members.is_empty() {
                    self.rooms.remove(room);
                    debug!("Room '{room}' is empty, removed");
                }
            }
        }
    }

    fn join_room(&mut self, connection_id: ConnectionId, room: String) {
        if room.is_empty() {
            warn!("Connection {connection_id} tried to join an unnamed room");
            return;
        }

        let Some(client) = self.clients.get_mut(&connection_id) else {
            debug!("Join from unknown connection {connection_id} ignored");
            return;
        };

        if !client.rooms.insert(room.clone()) {
            return;
        }

        let members = self.rooms.entry(room.clone()).or_default();
        members.insert(connection_id);
        debug!(
            "Connection {connection_id} joined '{room}' ({} members)",
            members.len()
        );
        self.metrics.rooms_active(self.rooms.len());
    }

    fn leave_room(&mut self, connection_id: ConnectionId, room: &str) {
        let Some(client) = self.clients.get_mut(&connection_id) else {
            debug!("Leave from unknown connection {connection_id} ignored");
            return;
        };

        if !client.rooms.remove(room) {
            return;
        }

        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&connection_id);
            if members.is_empty() {
                self.rooms.remove(room);
                debug!("Room '{room}' is empty, removed");
            }
        }
        debug!("Connection {connection_id} left '{room}'");
        self.metrics.rooms_active(self.rooms.len());
    }

    async fn broadcast(&mut self, envelope: BroadcastEnvelope) -> BroadcastOutcome {
        if !self.limiter.allow() {
            warn!(
                "Global rate limit exhausted, dropping '{}' broadcast to room '{}'",
                envelope.message_type, envelope.room
            );
            self.metrics.broadcast_rate_limited();
            return BroadcastOutcome::RateLimited;
        }

        let payload = match envelope.to_wire(chrono::Utc::now().timestamp()) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to encode '{}' broadcast: {e}", envelope.message_type);
                self.metrics.error_occurred(e.error_code());
                return BroadcastOutcome::Failed;
            }
        };

        self.replay.add(payload.clone());

        let targets = self.resolve_targets(&envelope);
        self.metrics.broadcast_published(targets.len());

        let mut delivered = 0;
        let mut dropped = 0;
        let mut pending = Vec::new();

        for (connection_id, sender) in targets {
            match sender.try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(payload)) => {
                    let timeout = self.config.send_timeout;
                    pending.push(async move {
                        (connection_id, sender.send_timeout(payload, timeout).await)
                    });
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Queue for {connection_id} already closed, skipping");
                    self.metrics.message_dropped();
                    dropped += 1;
                }
            }
        }

        // Full queues wait concurrently, so one stuck consumer costs one timeout
        for (connection_id, result) in join_all(pending).await {
            match result {
                Ok(()) => delivered += 1,
                Err(SendTimeoutError::Timeout(_)) => {
                    let e = WsError::SendBufferFull {
                        location: ErrorLocation::from(Location::caller()),
                    };
                    warn!(
                        "Dropped '{}' for connection {connection_id}: {e}",
                        envelope.message_type
                    );
                    self.metrics.message_dropped();
                    self.metrics.error_occurred(e.error_code());
                    dropped += 1;
                }
                Err(SendTimeoutError::Closed(_)) => {
                    self.metrics.message_dropped();
                    dropped += 1;
                }
            }
        }

        debug!(
            "Broadcast '{}' to room '{}': {delivered} delivered, {dropped} dropped",
            envelope.message_type, envelope.room
        );

        BroadcastOutcome::Delivered { delivered, dropped }
    }

    fn resolve_targets(
        &self,
        envelope: &BroadcastEnvelope,
    ) -> Vec<(ConnectionId, mpsc::Sender<Utf8Bytes>)> {
        let wanted = |id: &ConnectionId| !envelope.excluded.contains(id);

        if envelope.is_global() {
            return self
                .clients
                .values()
                .filter(|client| wanted(&client.id))
                .map(|client| (client.id, client.sender.clone()))
                .collect();
        }

        self.rooms
            .get(&envelope.room)
            .into_iter()
            .flatten()
            .filter(|&id| wanted(id))
            .filter_map(|id| self.clients.get(id))
            .map(|client| (client.id, client.sender.clone()))
            .collect()
    }

    fn sweep_stale(&mut self) {
        let now = Instant::now();
        let stale_after = self.config.stale_after;

        let stale: Vec<ConnectionId> = self
            .clients
            .values()
            .filter(|client| client.status.idle_for(now) > stale_after)
            .map(|client| client.id)
            .collect();

        for connection_id in stale {
            warn!(
                "Evicting connection {connection_id}: no pong for over {}s",
                stale_after.as_secs()
            );
            self.metrics.error_occurred("STALE_CONNECTION");
            self.unregister(connection_id, "stale");
        }
    }

    fn stats(&self) -> HubStats {
        HubStats {
            connections: self.clients.len(),
            rooms: self.rooms.len(),
            replay_len: self.replay.len(),
        }
    }

    fn close_all(&mut self) {
        let count = self.clients.len();
        for (_, handle) in self.clients.drain() {
            handle.status.transition(ConnectionState::Closing);
            self.metrics.connection_unregistered("shutdown");
        }
        self.rooms.clear();
        info!("Hub coordinator stopped, closed {count} connections");
    }
}
