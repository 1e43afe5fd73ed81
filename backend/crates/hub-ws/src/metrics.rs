use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use metrics::{counter, gauge};
use serde::Serialize;

/// Point-in-time copy of the hub's counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub active_connections: u64,
    pub connections_total: u64,
    pub messages_received: u64,
    pub bytes_received: u64,
    pub messages_sent: u64,
    pub bytes_sent: u64,
    pub broadcasts_published: u64,
    pub broadcasts_rate_limited: u64,
    pub messages_dropped: u64,
    pub frames_rate_limited: u64,
    pub errors: u64,
}

/// Metrics collector for hub operations.
///
/// Every event goes to the `metrics` facade (exported by whatever recorder the
/// binary installs) and to an in-process snapshot guarded by a narrow mutex.
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
    counters: Arc<Mutex<MetricsSnapshot>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "room_hub",
            counters: Arc::new(Mutex::new(MetricsSnapshot::default())),
        }
    }

    /// Record a connection entering the registry
    pub fn connection_registered(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);

        let mut counters = self.lock();
        counters.active_connections += 1;
        counters.connections_total += 1;
    }

    /// Record a connection leaving the registry
    pub fn connection_unregistered(&self, reason: &'static str) {
        counter!(format!("{}.connections.closed", self.prefix), "reason" => reason).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);

        let mut counters = self.lock();
        counters.active_connections = counters.active_connections.saturating_sub(1);
    }

    /// Record a frame read from a client
    pub fn message_received(&self, bytes: usize) {
        counter!(format!("{}.messages.received", self.prefix)).increment(1);
        counter!(format!("{}.bytes.received", self.prefix)).increment(bytes as u64);

        let mut counters = self.lock();
        counters.messages_received += 1;
        counters.bytes_received += bytes as u64;
    }

    /// Record a frame written to a client
    pub fn message_sent(&self, bytes: usize) {
        counter!(format!("{}.messages.sent", self.prefix)).increment(1);
        counter!(format!("{}.bytes.sent", self.prefix)).increment(bytes as u64);

        let mut counters = self.lock();
        counters.messages_sent += 1;
        counters.bytes_sent += bytes as u64;
    }

    /// Record a broadcast that passed the global limiter
    pub fn broadcast_published(&self, targets: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        gauge!(format!("{}.broadcast.targets", self.prefix)).set(targets as f64);

        self.lock().broadcasts_published += 1;
    }

    /// Record a broadcast shed by the global limiter
    pub fn broadcast_rate_limited(&self) {
        counter!(format!("{}.broadcast.rate_limited", self.prefix)).increment(1);

        self.lock().broadcasts_rate_limited += 1;
    }

    /// Record one message dropped for one slow or closed consumer
    pub fn message_dropped(&self) {
        counter!(format!("{}.messages.dropped", self.prefix)).increment(1);

        self.lock().messages_dropped += 1;
    }

    /// Record an inbound frame rejected by a connection's bucket
    pub fn frame_rate_limited(&self) {
        counter!(format!("{}.frames.rate_limited", self.prefix)).increment(1);

        self.lock().frames_rate_limited += 1;
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_code: &'static str) {
        counter!(format!("{}.errors.total", self.prefix), "code" => error_code).increment(1);

        self.lock().errors += 1;
    }

    /// Record the number of live rooms
    pub fn rooms_active(&self, count: usize) {
        gauge!(format!("{}.rooms.active", self.prefix)).set(count as f64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MetricsSnapshot> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
