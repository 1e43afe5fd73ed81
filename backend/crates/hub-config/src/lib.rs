mod broadcast_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod rate_limit_config;
mod server_config;
mod sweep_config;
mod websocket_config;

#[cfg(test)]
mod tests;

pub use broadcast_config::{
    BroadcastConfig, DEFAULT_COMMAND_BUFFER_SIZE, DEFAULT_REPLAY_CAPACITY, DEFAULT_SEND_TIMEOUT_MS,
};
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_limit_config::{
    DEFAULT_CLIENT_CAPACITY, DEFAULT_CLIENT_REFILL_PER_SEC, DEFAULT_GLOBAL_CAPACITY,
    DEFAULT_GLOBAL_REFILL, DEFAULT_GLOBAL_TICK_MS, RateLimitConfig,
};
pub use server_config::ServerConfig;
pub use sweep_config::{DEFAULT_STALE_AFTER_SECS, DEFAULT_SWEEP_INTERVAL_SECS, SweepConfig};
pub use websocket_config::{
    DEFAULT_MAX_COALESCE, DEFAULT_PING_INTERVAL_SECS, DEFAULT_READ_TIMEOUT_SECS,
    DEFAULT_SEND_BUFFER_SIZE, DEFAULT_WRITE_TIMEOUT_SECS, WebSocketConfig,
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "HUB_CONFIG_DIR";
/// Config directory used when `HUB_CONFIG_DIR` is not set (relative to cwd)
pub const DEFAULT_CONFIG_DIR: &str = ".hub";
/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";
