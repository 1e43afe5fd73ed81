use crate::{GlobalRateLimitConfig, ShutdownGuard};

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Hub-wide token bucket refilled by a single background ticker.
///
/// Bounds total broadcast throughput: over any window the number of admitted
/// broadcasts is at most `capacity + refill * ticks`.
pub struct GlobalRateLimiter {
    tokens: AtomicU32,
    config: GlobalRateLimitConfig,
}

impl GlobalRateLimiter {
    /// Create a limiter that starts full
    pub fn new(config: GlobalRateLimitConfig) -> Self {
        Self {
            tokens: AtomicU32::new(config.capacity),
            config,
        }
    }

    /// Take one token if available
    pub fn allow(&self) -> bool {
        self.tokens
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1))
            .is_ok()
    }

    /// Add one tick's worth of tokens, capped at capacity
    pub fn refill(&self) {
        if self.config.refill == 0 {
            return;
        }

        let capacity = self.config.capacity;
        let refill = self.config.refill;
        let _ = self
            .tokens
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| {
                Some(t.saturating_add(refill).min(capacity))
            });
    }

    /// Tokens currently available
    pub fn available(&self) -> u32 {
        self.tokens.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &GlobalRateLimitConfig {
        &self.config
    }

    /// Spawn the refill ticker; it stops when shutdown is signalled
    pub fn spawn_refill(self: &Arc<Self>, mut shutdown: ShutdownGuard) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        // interval_at panics on a zero period
        let tick = limiter.config.tick.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + tick, tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => limiter.refill(),
                    _ = shutdown.wait() => {
                        log::debug!("Global rate limiter refill stopped");
                        break;
                    }
                }
            }
        })
    }
}
