use crate::TokenBucketConfig;

use std::num::NonZeroU32;

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Per-connection rate limiter.
///
/// Refill is computed lazily from elapsed time on every check, so no timer runs
/// per connection. A full bucket admits `capacity` frames back to back, after
/// which one frame is admitted every `1 / refill_per_sec` seconds.
pub struct TokenBucket {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: TokenBucketConfig,
}

impl TokenBucket {
    pub fn new(config: TokenBucketConfig) -> Self {
        let refill = NonZeroU32::new(config.refill_per_sec).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.capacity).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(refill).allow_burst(burst);

        Self {
            limiter: RateLimiter::direct(quota),
            config,
        }
    }

    /// Take one token if available
    pub fn allow(&self) -> bool {
        self.limiter.check().is_ok()
    }

    pub fn config(&self) -> &TokenBucketConfig {
        &self.config
    }
}
