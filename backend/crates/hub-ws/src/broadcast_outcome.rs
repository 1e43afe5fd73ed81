/// Result of one broadcast, as seen by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Passed the global limiter; `dropped` targets were too slow or gone
    Delivered { delivered: usize, dropped: usize },
    /// Shed by the global limiter; nobody received it
    RateLimited,
    /// Envelope could not be serialized
    Failed,
}
