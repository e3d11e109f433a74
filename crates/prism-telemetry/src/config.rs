//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on log lines.
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error), or any
    /// `EnvFilter` directive string.
    pub log_level: String,

    /// Whether to emit JSON formatted logs.
    pub json_logs: bool,

    /// Whether to include span targets in output.
    pub with_targets: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "prism".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_targets: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PRISM_SERVICE_NAME`: Service name (default: prism)
    /// - `PRISM_LOG` or `RUST_LOG`: Log level filter (default: info)
    /// - `PRISM_LOG_JSON`: Emit JSON logs (default: false outside containers)
    /// - `PRISM_LOG_TARGETS`: Include targets in output (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("PRISM_SERVICE_NAME").unwrap_or_else(|_| "prism".to_string()),

            log_level: env::var("PRISM_LOG")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("PRISM_LOG_JSON")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            with_targets: env::var("PRISM_LOG_TARGETS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}
