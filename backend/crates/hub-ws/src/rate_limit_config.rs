use std::time::Duration;

use hub_config::{
    DEFAULT_CLIENT_CAPACITY, DEFAULT_CLIENT_REFILL_PER_SEC, DEFAULT_GLOBAL_CAPACITY,
    DEFAULT_GLOBAL_REFILL, DEFAULT_GLOBAL_TICK_MS,
};

/// Per-connection bucket settings
#[derive(Debug, Clone, Copy)]
pub struct TokenBucketConfig {
    /// Maximum burst of frames
    pub capacity: u32,
    /// Tokens earned per second of wall-clock time
    pub refill_per_sec: u32,
}

impl Default for TokenBucketConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CLIENT_CAPACITY,
            refill_per_sec: DEFAULT_CLIENT_REFILL_PER_SEC,
        }
    }
}

/// Hub-wide bucket settings
#[derive(Debug, Clone, Copy)]
pub struct GlobalRateLimitConfig {
    /// Maximum tokens held
    pub capacity: u32,
    /// Tokens added on every tick (0 = never refill)
    pub refill: u32,
    /// Refill period
    pub tick: Duration,
}

impl Default for GlobalRateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_GLOBAL_CAPACITY,
            refill: DEFAULT_GLOBAL_REFILL,
            tick: Duration::from_millis(DEFAULT_GLOBAL_TICK_MS),
        }
    }
}

impl From<&hub_config::RateLimitConfig> for TokenBucketConfig {
    fn from(config: &hub_config::RateLimitConfig) -> Self {
        Self {
            capacity: config.client_capacity,
            refill_per_sec: config.client_refill_per_sec,
        }
    }
}

impl From<&hub_config::RateLimitConfig> for GlobalRateLimitConfig {
    fn from(config: &hub_config::RateLimitConfig) -> Self {
        Self {
            capacity: config.global_capacity,
            refill: config.global_refill,
            tick: Duration::from_millis(config.global_tick_ms),
        }
    }
}
