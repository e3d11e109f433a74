//! # Prism Telemetry
//!
//! Structured logging setup for the Prism gateway pipeline: an env-driven
//! configuration and a single `tracing` subscriber installation shared by
//! the runtime binary and integration tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prism_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())
//!         .expect("Failed to init telemetry");
//!     // Log lines now flow through the configured subscriber.
//! }
//! ```

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log level string did not parse as an `EnvFilter` directive.
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    /// A global subscriber was already installed.
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

/// Install the global tracing subscriber.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|_| TelemetryError::InvalidFilter(config.log_level.clone()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_targets);

    let installed = if config.json_logs {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::info!(service = %config.service_name, "Telemetry initialized");
    Ok(TelemetryGuard { _private: () })
}

/// Guard that keeps telemetry active for the process lifetime.
pub struct TelemetryGuard {
    _private: (),
}
