//! # Gateway Container
//!
//! Dependency wiring for the pipeline: builds the cache, processor, and
//! registry from configuration and hands them out as shared handles.

pub mod config;

pub use config::{load_config, CacheConfig, ConfigError, GatewayConfig};

use std::sync::Arc;

use tracing::info;

use prism_cache::CacheProvider;
use prism_pipeline::{EventProcessor, ProducerRegistry};

/// The wired pipeline components, shared by the runtime and by anything
/// that subscribes to shard queues.
pub struct GatewayContainer {
    /// The validated configuration this container was built from.
    pub config: GatewayConfig,
    /// The entity cache capability set.
    pub cache: CacheProvider,
    /// The shared event processor.
    pub processor: Arc<EventProcessor>,
    /// The live-queue registry.
    pub registry: Arc<ProducerRegistry>,
}

impl GatewayContainer {
    /// Wire the pipeline components from configuration.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let cache = if config.cache.cache_messages {
            CacheProvider::in_memory()
        } else {
            CacheProvider::in_memory_without_messages()
        };
        info!(
            shard_count = config.sharding.shard_count,
            cache_messages = config.cache.cache_messages,
            "Gateway container wired"
        );

        let processor = Arc::new(EventProcessor::new(cache.clone()));
        let registry = Arc::new(ProducerRegistry::new());

        Self {
            config,
            cache,
            processor,
            registry,
        }
    }

    /// The shard ids this configuration runs.
    #[must_use]
    pub fn shard_ids(&self) -> Vec<u64> {
        (0..self.config.sharding.shard_count).collect()
    }
}
