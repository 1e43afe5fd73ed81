use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_SWEEP_INTERVAL_SECS: u64 = 1;
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

pub const MIN_STALE_AFTER_SECS: u64 = 2;
pub const MAX_STALE_AFTER_SECS: u64 = 86_400;
pub const DEFAULT_STALE_AFTER_SECS: u64 = 90;

/// Stale-connection sweep settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// How often the hub looks for stale connections
    pub interval_secs: u64,
    /// A connection with no pong for this long is evicted
    pub stale_after_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.interval_secs < MIN_SWEEP_INTERVAL_SECS
            || self.interval_secs > MAX_SWEEP_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "sweep.interval_secs must be {}-{}, got {}",
                MIN_SWEEP_INTERVAL_SECS, MAX_SWEEP_INTERVAL_SECS, self.interval_secs
            )));
        }

        if self.stale_after_secs < MIN_STALE_AFTER_SECS
            || self.stale_after_secs > MAX_STALE_AFTER_SECS
        {
            return Err(ConfigError::config(format!(
                "sweep.stale_after_secs must be {}-{}, got {}",
                MIN_STALE_AFTER_SECS, MAX_STALE_AFTER_SECS, self.stale_after_secs
            )));
        }

        Ok(())
    }
}
