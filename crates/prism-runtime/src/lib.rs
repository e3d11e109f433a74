//! # Prism Runtime
//!
//! Wires the shard pipeline together and runs it: configuration, the
//! component container, the source adapter, and the supervised lifecycle.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and dependency wiring
//! - `adapters/` - Port implementations (raw event sources)

pub mod adapters;
pub mod container;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use prism_pipeline::{ProducerRegistry, RawEventSource, ShardSupervisor};

use crate::container::{GatewayConfig, GatewayContainer};

/// The running gateway: wired components plus the supervised shard pairs.
pub struct GatewayRuntime {
    container: Arc<GatewayContainer>,
    source: Arc<dyn RawEventSource>,
    monitors: Mutex<Vec<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayRuntime {
    /// Build a runtime over a validated configuration and a source.
    #[must_use]
    pub fn new(config: GatewayConfig, source: Arc<dyn RawEventSource>) -> Self {
        info!("Creating Prism gateway runtime");
        let container = Arc::new(GatewayContainer::new(config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            container,
            source,
            monitors: Mutex::new(Vec::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Start one supervised queue/consumer pair per configured shard.
    pub fn start(&self) -> Result<()> {
        let shards = self.container.shard_ids();
        info!(shards = shards.len(), "Starting shard pipeline");

        let supervisor = ShardSupervisor::new(
            shards,
            Arc::clone(&self.source),
            Arc::clone(&self.container.processor),
            Arc::clone(&self.container.registry),
        )
        .with_restart_delay(Duration::from_millis(
            self.container.config.supervision.restart_delay_ms,
        ));

        let monitors = supervisor.start(self.shutdown_rx.clone());
        *self.monitors.lock() = monitors;

        info!("Shard pipeline running");
        Ok(())
    }

    /// Shutdown the pipeline gracefully: signal every monitor, then wait
    /// for them to finish tearing their pairs down.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if self.shutdown_tx.send(true).is_err() {
            warn!("All shard monitors already stopped");
        }

        let monitors = std::mem::take(&mut *self.monitors.lock());
        for monitor in monitors {
            if let Err(error) = monitor.await {
                warn!(%error, "Shard monitor ended abnormally");
            }
        }
        info!("Shutdown complete");
    }

    /// The wired component container.
    #[must_use]
    pub fn container(&self) -> Arc<GatewayContainer> {
        Arc::clone(&self.container)
    }

    /// The registry downstream subscribers resolve shard queues through.
    #[must_use]
    pub fn registry(&self) -> Arc<ProducerRegistry> {
        Arc::clone(&self.container.registry)
    }
}
