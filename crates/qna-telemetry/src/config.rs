//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log records
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output (for development)
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to register the Prometheus collectors on init
    pub metrics_enabled: bool,

    /// Deployment environment (dev, staging, prod)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "qna-hub".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            metrics_enabled: true,
            environment: "dev".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QNA_SERVICE_NAME`: Service name (default: qna-hub)
    /// - `QNA_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `QNA_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `QNA_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `QNA_METRICS`: Register Prometheus collectors (default: true)
    /// - `QNA_ENV`: Deployment environment (default: dev)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("QNA_SERVICE_NAME").unwrap_or_else(|_| "qna-hub".to_string()),

            log_level: env::var("QNA_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("QNA_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            json_logs: env::var("QNA_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(is_container),

            metrics_enabled: env::var("QNA_METRICS")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            environment: env::var("QNA_ENV").unwrap_or_else(|_| "dev".to_string()),
        }
    }

    /// Configuration used by tests: quiet, no global collectors.
    pub fn for_testing() -> Self {
        Self {
            log_level: "warn".to_string(),
            console_output: false,
            metrics_enabled: false,
            environment: "test".to_string(),
            ..Self::default()
        }
    }
}

/// Parse a boolean-ish environment value, falling back to `default` when
/// the value is not recognised.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
