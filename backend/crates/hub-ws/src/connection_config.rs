use crate::TokenBucketConfig;

use std::time::Duration;

use hub_config::{
    DEFAULT_MAX_COALESCE, DEFAULT_PING_INTERVAL_SECS, DEFAULT_READ_TIMEOUT_SECS,
    DEFAULT_SEND_BUFFER_SIZE, DEFAULT_WRITE_TIMEOUT_SECS,
};

/// Configuration for a single client connection
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound queue capacity (bounded to handle backpressure)
    pub send_buffer_size: usize,
    /// Keepalive ping period
    pub ping_interval: Duration,
    /// Inactivity deadline on reads; only pongs push it forward
    pub read_timeout: Duration,
    /// Deadline for each socket write
    pub write_timeout: Duration,
    /// Extra queued messages written before each flush
    pub max_coalesce: usize,
    /// Inbound frame limiter
    pub rate_limit: TokenBucketConfig,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            ping_interval: Duration::from_secs(DEFAULT_PING_INTERVAL_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
            max_coalesce: DEFAULT_MAX_COALESCE,
            rate_limit: TokenBucketConfig::default(),
        }
    }
}

impl From<&hub_config::Config> for ConnectionConfig {
    fn from(config: &hub_config::Config) -> Self {
        Self {
            send_buffer_size: config.websocket.send_buffer_size,
            ping_interval: Duration::from_secs(config.websocket.ping_interval_secs),
            read_timeout: Duration::from_secs(config.websocket.read_timeout_secs),
            write_timeout: Duration::from_secs(config.websocket.write_timeout_secs),
            max_coalesce: config.websocket.max_coalesce,
            rate_limit: TokenBucketConfig::from(&config.rate_limit),
        }
    }
}
