use crate::GlobalRateLimitConfig;

use std::time::Duration;

use hub_config::{
    DEFAULT_COMMAND_BUFFER_SIZE, DEFAULT_REPLAY_CAPACITY, DEFAULT_SEND_TIMEOUT_MS,
    DEFAULT_STALE_AFTER_SECS, DEFAULT_SWEEP_INTERVAL_SECS,
};

/// Configuration for the hub coordinator
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// How long one full outbound queue may hold up a broadcast
    pub send_timeout: Duration,
    /// Entries kept in the replay ring buffer
    pub replay_capacity: usize,
    /// Coordinator command channel capacity
    pub command_buffer_size: usize,
    /// Stale sweep period
    pub sweep_interval: Duration,
    /// Connections silent for longer than this are evicted
    pub stale_after: Duration,
    pub global_rate_limit: GlobalRateLimitConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_millis(DEFAULT_SEND_TIMEOUT_MS),
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
            command_buffer_size: DEFAULT_COMMAND_BUFFER_SIZE,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
            global_rate_limit: GlobalRateLimitConfig::default(),
        }
    }
}

impl From<&hub_config::Config> for HubConfig {
    fn from(config: &hub_config::Config) -> Self {
        Self {
            send_timeout: Duration::from_millis(config.broadcast.send_timeout_ms),
            replay_capacity: config.broadcast.replay_capacity,
            command_buffer_size: config.broadcast.command_buffer_size,
            sweep_interval: Duration::from_secs(config.sweep.interval_secs),
            stale_after: Duration::from_secs(config.sweep.stale_after_secs),
            global_rate_limit: GlobalRateLimitConfig::from(&config.rate_limit),
        }
    }
}
