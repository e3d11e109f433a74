//! # Gateway Configuration
//!
//! Unified configuration for the shard pipeline and runtime parameters.
//! All values have sane defaults with environment override capability.

use thiserror::Error;

/// Complete gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Sharding configuration.
    pub sharding: ShardingConfig,
    /// Supervision configuration.
    pub supervision: SupervisionConfig,
    /// Cache configuration.
    pub cache: CacheConfig,
}

impl GatewayConfig {
    /// Validate the configuration before starting the pipeline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sharding.shard_count == 0 {
            return Err(ConfigError::NoShards);
        }
        if self.supervision.restart_delay_ms == 0 {
            return Err(ConfigError::ZeroRestartDelay);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Shard count is zero; the pipeline would have nothing to run.
    #[error("Shard count must be at least 1. Set PRISM_SHARD_COUNT.")]
    NoShards,

    /// Restart delay is zero; a crash-looping shard would spin hot.
    #[error("Restart delay must be non-zero. Set PRISM_RESTART_DELAY_MS.")]
    ZeroRestartDelay,
}

/// Sharding configuration.
#[derive(Debug, Clone)]
pub struct ShardingConfig {
    /// Number of shards to run, ids `0..shard_count`.
    pub shard_count: u64,
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self { shard_count: 1 }
    }
}

/// Supervision configuration.
#[derive(Debug, Clone)]
pub struct SupervisionConfig {
    /// Delay between a shard pair's teardown and its restart, in
    /// milliseconds.
    pub restart_delay_ms: u64,
}

impl Default for SupervisionConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: 1000,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether to cache messages. Disabling trades update/delete detail
    /// for memory.
    pub cache_messages: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_messages: true,
        }
    }
}

/// Load configuration from environment variables over the defaults.
///
/// # Environment Variables
///
/// - `PRISM_SHARD_COUNT`: Number of shards (default: 1)
/// - `PRISM_RESTART_DELAY_MS`: Restart delay in milliseconds (default: 1000)
/// - `PRISM_CACHE_MESSAGES`: Cache messages (default: true)
#[must_use]
pub fn load_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();

    if let Ok(count) = std::env::var("PRISM_SHARD_COUNT") {
        if let Ok(n) = count.parse() {
            config.sharding.shard_count = n;
        }
    }
    if let Ok(delay) = std::env::var("PRISM_RESTART_DELAY_MS") {
        if let Ok(ms) = delay.parse() {
            config.supervision.restart_delay_ms = ms;
        }
    }
    if let Ok(flag) = std::env::var("PRISM_CACHE_MESSAGES") {
        config.cache.cache_messages = flag.to_lowercase() != "false" && flag != "0";
    }

    config
}
