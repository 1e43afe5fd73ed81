use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Per-target enqueue timeout (milliseconds)
pub const MIN_SEND_TIMEOUT_MS: u64 = 1;
pub const MAX_SEND_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 100;

// Replay ring buffer capacity
pub const MIN_REPLAY_CAPACITY: usize = 1;
pub const MAX_REPLAY_CAPACITY: usize = 1_000_000;
pub const DEFAULT_REPLAY_CAPACITY: usize = 1024;

// Coordinator command channel capacity
pub const MIN_COMMAND_BUFFER_SIZE: usize = 1;
pub const MAX_COMMAND_BUFFER_SIZE: usize = 1_000_000;
pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 1024;

/// Broadcast fan-out settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// How long the hub waits on one full outbound queue before dropping
    pub send_timeout_ms: u64,
    /// Number of recent envelopes kept for diagnostic replay
    pub replay_capacity: usize,
    /// Capacity of the hub coordinator's command channel
    pub command_buffer_size: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
            command_buffer_size: DEFAULT_COMMAND_BUFFER_SIZE,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_timeout_ms < MIN_SEND_TIMEOUT_MS || self.send_timeout_ms > MAX_SEND_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "broadcast.send_timeout_ms must be {}-{}, got {}",
                MIN_SEND_TIMEOUT_MS, MAX_SEND_TIMEOUT_MS, self.send_timeout_ms
            )));
        }

        if self.replay_capacity < MIN_REPLAY_CAPACITY || self.replay_capacity > MAX_REPLAY_CAPACITY
        {
            return Err(ConfigError::config(format!(
                "broadcast.replay_capacity must be {}-{}, got {}",
                MIN_REPLAY_CAPACITY, MAX_REPLAY_CAPACITY, self.replay_capacity
            )));
        }

        if self.command_buffer_size < MIN_COMMAND_BUFFER_SIZE
            || self.command_buffer_size > MAX_COMMAND_BUFFER_SIZE
        {
            return Err(ConfigError::config(format!(
                "broadcast.command_buffer_size must be {}-{}, got {}",
                MIN_COMMAND_BUFFER_SIZE, MAX_COMMAND_BUFFER_SIZE, self.command_buffer_size
            )));
        }

        Ok(())
    }
}
