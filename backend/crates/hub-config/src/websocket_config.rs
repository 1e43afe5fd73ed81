use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Outbound queue capacity per connection
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 256;

// Keepalive ping interval (seconds)
pub const MIN_PING_INTERVAL_SECS: u64 = 1;
pub const MAX_PING_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 30;

// Read inactivity deadline (seconds)
pub const MIN_READ_TIMEOUT_SECS: u64 = 2;
pub const MAX_READ_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

// Per-write deadline (seconds)
pub const MIN_WRITE_TIMEOUT_SECS: u64 = 1;
pub const MAX_WRITE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

// Extra queued messages written per flush
pub const MIN_MAX_COALESCE: usize = 0;
pub const MAX_MAX_COALESCE: usize = 1000;
pub const DEFAULT_MAX_COALESCE: usize = 10;

/// WebSocket connection settings.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outbound queue capacity
    pub send_buffer_size: usize,
    /// Keepalive ping interval in seconds
    pub ping_interval_secs: u64,
    /// Read inactivity deadline in seconds (refreshed by pongs)
    pub read_timeout_secs: u64,
    /// Deadline applied to every socket write
    pub write_timeout_secs: u64,
    /// Additional already-queued messages drained per write pass
    pub max_coalesce: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            ping_interval_secs: DEFAULT_PING_INTERVAL_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            max_coalesce: DEFAULT_MAX_COALESCE,
        }
    }
}

impl WebSocketConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_buffer_size < MIN_SEND_BUFFER_SIZE
            || self.send_buffer_size > MAX_SEND_BUFFER_SIZE
        {
            return Err(ConfigError::config(format!(
                "websocket.send_buffer_size must be {}-{}, got {}",
                MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
            )));
        }

        if self.ping_interval_secs < MIN_PING_INTERVAL_SECS
            || self.ping_interval_secs > MAX_PING_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "websocket.ping_interval_secs must be {}-{}, got {}",
                MIN_PING_INTERVAL_SECS, MAX_PING_INTERVAL_SECS, self.ping_interval_secs
            )));
        }

        if self.read_timeout_secs < MIN_READ_TIMEOUT_SECS
            || self.read_timeout_secs > MAX_READ_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "websocket.read_timeout_secs must be {}-{}, got {}",
                MIN_READ_TIMEOUT_SECS, MAX_READ_TIMEOUT_SECS, self.read_timeout_secs
            )));
        }

        if self.write_timeout_secs < MIN_WRITE_TIMEOUT_SECS
            || self.write_timeout_secs > MAX_WRITE_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "websocket.write_timeout_secs must be {}-{}, got {}",
                MIN_WRITE_TIMEOUT_SECS, MAX_WRITE_TIMEOUT_SECS, self.write_timeout_secs
            )));
        }

        if self.max_coalesce > MAX_MAX_COALESCE {
            return Err(ConfigError::config(format!(
                "websocket.max_coalesce must be {}-{}, got {}",
                MIN_MAX_COALESCE, MAX_MAX_COALESCE, self.max_coalesce
            )));
        }

        // A pong can only arrive after a ping, so the deadline must outlast the interval
        if self.read_timeout_secs <= self.ping_interval_secs {
            return Err(ConfigError::config(format!(
                "websocket.read_timeout_secs ({}) must be greater than ping_interval_secs ({})",
                self.read_timeout_secs, self.ping_interval_secs
            )));
        }

        Ok(())
    }
}
