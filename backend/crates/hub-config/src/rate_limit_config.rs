use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Per-connection bucket
pub const MIN_CLIENT_CAPACITY: u32 = 1;
pub const MAX_CLIENT_CAPACITY: u32 = 10_000;
pub const DEFAULT_CLIENT_CAPACITY: u32 = 10;

pub const MIN_CLIENT_REFILL_PER_SEC: u32 = 1;
pub const MAX_CLIENT_REFILL_PER_SEC: u32 = 10_000;
pub const DEFAULT_CLIENT_REFILL_PER_SEC: u32 = 10;

// Hub-wide bucket
pub const MIN_GLOBAL_CAPACITY: u32 = 1;
pub const MAX_GLOBAL_CAPACITY: u32 = 1_000_000;
pub const DEFAULT_GLOBAL_CAPACITY: u32 = 1000;

pub const MAX_GLOBAL_REFILL: u32 = 1_000_000;
pub const DEFAULT_GLOBAL_REFILL: u32 = 1000;

pub const MIN_GLOBAL_TICK_MS: u64 = 1;
pub const MAX_GLOBAL_TICK_MS: u64 = 60_000;
pub const DEFAULT_GLOBAL_TICK_MS: u64 = 100;

/// Rate limiting settings.
/// `client_*` applies to every connection's inbound frames, `global_*` to hub broadcasts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Burst size of each connection's bucket
    pub client_capacity: u32,
    /// Tokens earned per second by each connection
    pub client_refill_per_sec: u32,
    /// Burst size of the hub-wide bucket
    pub global_capacity: u32,
    /// Tokens added to the hub-wide bucket every tick (0 disables refill)
    pub global_refill: u32,
    /// Hub-wide refill tick in milliseconds
    pub global_tick_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            client_capacity: DEFAULT_CLIENT_CAPACITY,
            client_refill_per_sec: DEFAULT_CLIENT_REFILL_PER_SEC,
            global_capacity: DEFAULT_GLOBAL_CAPACITY,
            global_refill: DEFAULT_GLOBAL_REFILL,
            global_tick_ms: DEFAULT_GLOBAL_TICK_MS,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.client_capacity < MIN_CLIENT_CAPACITY || self.client_capacity > MAX_CLIENT_CAPACITY
        {
            return Err(ConfigError::config(format!(
                "rate_limit.client_capacity must be {}-{}, got {}",
                MIN_CLIENT_CAPACITY, MAX_CLIENT_CAPACITY, self.client_capacity
            )));
        }

        if self.client_refill_per_sec < MIN_CLIENT_REFILL_PER_SEC
            || self.client_refill_per_sec > MAX_CLIENT_REFILL_PER_SEC
        {
            return Err(ConfigError::config(format!(
                "rate_limit.client_refill_per_sec must be {}-{}, got {}",
                MIN_CLIENT_REFILL_PER_SEC, MAX_CLIENT_REFILL_PER_SEC, self.client_refill_per_sec
            )));
        }

        if self.global_capacity < MIN_GLOBAL_CAPACITY || self.global_capacity > MAX_GLOBAL_CAPACITY
        {
            return Err(ConfigError::config(format!(
                "rate_limit.global_capacity must be {}-{}, got {}",
                MIN_GLOBAL_CAPACITY, MAX_GLOBAL_CAPACITY, self.global_capacity
            )));
        }

        if self.global_refill > MAX_GLOBAL_REFILL {
            return Err(ConfigError::config(format!(
                "rate_limit.global_refill must be 0-{}, got {}",
                MAX_GLOBAL_REFILL, self.global_refill
            )));
        }

        if self.global_tick_ms < MIN_GLOBAL_TICK_MS || self.global_tick_ms > MAX_GLOBAL_TICK_MS {
            return Err(ConfigError::config(format!(
                "rate_limit.global_tick_ms must be {}-{}, got {}",
                MIN_GLOBAL_TICK_MS, MAX_GLOBAL_TICK_MS, self.global_tick_ms
            )));
        }

        Ok(())
    }
}
