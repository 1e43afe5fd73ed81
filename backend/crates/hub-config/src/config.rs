use crate::{
    BroadcastConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, LoggingConfig, RateLimitConfig, ServerConfig, SweepConfig,
    WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub broadcast: BroadcastConfig,
    pub rate_limit: RateLimitConfig,
    pub sweep: SweepConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for HUB_CONFIG_DIR env var, else use ./.hub/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply HUB_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: HUB_CONFIG_DIR env var > ./.hub/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.websocket.validate()?;
        self.broadcast.validate()?;
        self.rate_limit.validate()?;
        self.sweep.validate()?;

        if self.sweep.stale_after_secs <= self.websocket.ping_interval_secs {
            return Err(ConfigError::config(format!(
                "sweep.stale_after_secs ({}) must be greater than websocket.ping_interval_secs ({})",
                self.sweep.stale_after_secs, self.websocket.ping_interval_secs
            )));
        }

        if let Some(ref file) = self.logging.file
            && (file.trim().is_empty() || file.contains(".."))
        {
            return Err(ConfigError::logging(
                "logging.file must be a plain file name and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);

        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );

        info!(
            "  websocket: buffer={}, ping={}s, read={}s, write={}s, coalesce={}",
            self.websocket.send_buffer_size,
            self.websocket.ping_interval_secs,
            self.websocket.read_timeout_secs,
            self.websocket.write_timeout_secs,
            self.websocket.max_coalesce
        );

        info!(
            "  broadcast: send_timeout={}ms, replay={}, commands={}",
            self.broadcast.send_timeout_ms,
            self.broadcast.replay_capacity,
            self.broadcast.command_buffer_size
        );

        info!(
            "  rate_limit: client={}@{}/s, global={} (+{}/{}ms)",
            self.rate_limit.client_capacity,
            self.rate_limit.client_refill_per_sec,
            self.rate_limit.global_capacity,
            self.rate_limit.global_refill,
            self.rate_limit.global_tick_ms
        );

        info!(
            "  sweep: every {}s, stale after {}s",
            self.sweep.interval_secs, self.sweep.stale_after_secs
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("HUB_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("HUB_SERVER_PORT", &mut self.server.port);

        // Logging
        Self::apply_env_parse("HUB_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("HUB_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_string("HUB_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_option_string("HUB_LOG_FILE", &mut self.logging.file);

        // WebSocket
        Self::apply_env_parse(
            "HUB_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "HUB_WS_PING_INTERVAL_SECS",
            &mut self.websocket.ping_interval_secs,
        );
        Self::apply_env_parse(
            "HUB_WS_READ_TIMEOUT_SECS",
            &mut self.websocket.read_timeout_secs,
        );
        Self::apply_env_parse(
            "HUB_WS_WRITE_TIMEOUT_SECS",
            &mut self.websocket.write_timeout_secs,
        );
        Self::apply_env_parse("HUB_WS_MAX_COALESCE", &mut self.websocket.max_coalesce);

        // Broadcast
        Self::apply_env_parse(
            "HUB_BROADCAST_SEND_TIMEOUT_MS",
            &mut self.broadcast.send_timeout_ms,
        );
        Self::apply_env_parse(
            "HUB_BROADCAST_REPLAY_CAPACITY",
            &mut self.broadcast.replay_capacity,
        );
        Self::apply_env_parse(
            "HUB_BROADCAST_COMMAND_BUFFER_SIZE",
            &mut self.broadcast.command_buffer_size,
        );

        // Rate limit
        Self::apply_env_parse(
            "HUB_RATE_LIMIT_CLIENT_CAPACITY",
            &mut self.rate_limit.client_capacity,
        );
        Self::apply_env_parse(
            "HUB_RATE_LIMIT_CLIENT_REFILL_PER_SEC",
            &mut self.rate_limit.client_refill_per_sec,
        );
        Self::apply_env_parse(
            "HUB_RATE_LIMIT_GLOBAL_CAPACITY",
            &mut self.rate_limit.global_capacity,
        );
        Self::apply_env_parse(
            "HUB_RATE_LIMIT_GLOBAL_REFILL",
            &mut self.rate_limit.global_refill,
        );
        Self::apply_env_parse(
            "HUB_RATE_LIMIT_GLOBAL_TICK_MS",
            &mut self.rate_limit.global_tick_ms,
        );

        // Sweep
        Self::apply_env_parse("HUB_SWEEP_INTERVAL_SECS", &mut self.sweep.interval_secs);
        Self::apply_env_parse(
            "HUB_SWEEP_STALE_AFTER_SECS",
            &mut self.sweep.stale_after_secs,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
