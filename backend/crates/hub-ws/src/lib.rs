pub mod app_state;
pub mod broadcast_envelope;
pub mod broadcast_outcome;
pub mod client_frame;
pub mod client_handle;
pub mod connection;
pub mod connection_config;
pub mod connection_id;
pub mod connection_status;
pub mod error;
pub mod global_rate_limiter;
pub mod hub;
pub mod hub_config;
pub mod hub_stats;
pub mod metrics;
pub mod outbound_envelope;
pub mod rate_limit_config;
pub mod ring_buffer;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod token_bucket;

mod hub_command;
mod hub_coordinator;
mod write_pump;

pub use app_state::{AppState, handler};
pub use broadcast_envelope::{BroadcastEnvelope, CLIENT_BROADCAST_TYPE};
pub use broadcast_outcome::BroadcastOutcome;
pub use client_frame::{ClientFrame, FrameKind};
pub use client_handle::ClientHandle;
pub use connection::Connection;
pub use connection_config::ConnectionConfig;
pub use connection_id::ConnectionId;
pub use connection_status::{ConnectionState, ConnectionStatus};
pub use error::{Result, WsError};
pub use global_rate_limiter::GlobalRateLimiter;
pub use hub::Hub;
pub use hub_config::HubConfig;
pub use hub_stats::HubStats;
pub use metrics::{Metrics, MetricsSnapshot};
pub use outbound_envelope::OutboundEnvelope;
pub use rate_limit_config::{GlobalRateLimitConfig, TokenBucketConfig};
pub use ring_buffer::RingBuffer;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use token_bucket::TokenBucket;

#[cfg(test)]
mod tests;
