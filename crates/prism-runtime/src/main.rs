//! # Prism Gateway Runtime
//!
//! The main entry point for the Prism shard pipeline.
//!
//! Runs the pipeline over the loopback source: a self-contained deployment
//! that exercises the full normalize-and-republish path. Swapping in a real
//! gateway session layer means providing another [`RawEventSource`] at this
//! wiring point.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load and validate configuration (from env)
//! 3. Wire the container (cache, processor, registry)
//! 4. Start one supervised queue/consumer pair per shard
//! 5. Run until Ctrl+C, then drain and stop

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use prism_pipeline::RawEventSource;
use prism_runtime::adapters::LoopbackSource;
use prism_runtime::container::load_config;
use prism_runtime::GatewayRuntime;
use prism_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = load_config();
    config.validate().context("Invalid configuration")?;

    info!("===========================================");
    info!("  Prism Gateway Pipeline v0.1.0");
    info!("  Shards: {}", config.sharding.shard_count);
    info!("===========================================");

    let source: Arc<dyn RawEventSource> = Arc::new(LoopbackSource::new());
    let runtime = GatewayRuntime::new(config, source);
    runtime.start()?;

    info!("Pipeline is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    runtime.shutdown().await;
    Ok(())
}
