use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;

/// Connection lifecycle; transitions only move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Socket accepted, not yet handed to the hub
    Connecting,
    /// Register sent to the hub
    Registered,
    /// Reader and writer running
    Active,
    /// One side stopped and told the other
    Closing,
    /// Socket closed and unregistered
    Closed,
}

/// State shared between a connection's two loops and the hub coordinator
pub struct ConnectionStatus {
    state: watch::Sender<ConnectionState>,
    last_pong: Mutex<Instant>,
}

impl ConnectionStatus {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ConnectionState::Connecting);
        Self {
            state,
            last_pong: Mutex::new(Instant::now()),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Advance to `next`; returns false if already at or past it
    pub fn transition(&self, next: ConnectionState) -> bool {
        self.state.send_if_modified(|current| {
            if next > *current {
                *current = next;
                true
            } else {
                false
            }
        })
    }

    pub fn is_closing(&self) -> bool {
        self.state() >= ConnectionState::Closing
    }

    /// Resolves once the connection reaches `Closing` (or later)
    pub async fn closing(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state >= ConnectionState::Closing).await;
    }

    /// Record a keepalive response
    pub fn touch(&self) {
        *self.last_pong.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    pub fn last_pong(&self) -> Instant {
        *self.last_pong.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time since the last keepalive response
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_pong())
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}
