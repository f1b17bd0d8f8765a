//! # QnA Telemetry
//!
//! Logging and metrics for the Q&A interaction core.
//!
//! ## Components
//!
//! - Structured logs through `tracing-subscriber` (pretty or JSON)
//! - Prometheus counters and histograms for votes, resolutions,
//!   submissions and repository round trips
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qna_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QNA_SERVICE_NAME` | `qna-hub` | Service name in logs |
//! | `QNA_LOG_LEVEL` | `info` | Log level filter |
//! | `QNA_JSON_LOGS` | `false` | JSON log output |
//! | `QNA_METRICS` | `true` | Register Prometheus collectors |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, ANSWERS_ACCEPTED,
    ANSWERS_SUBMITTED, HELPFUL_TOGGLES, ORPHAN_REPLIES, REJECTED_INTENTS, REPOSITORY_FAILURES,
    REPOSITORY_LATENCY, VOTES_APPLIED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    /// Collector registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Configuration could not be interpreted.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and (optionally) metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = if config.metrics_enabled {
        Some(register_metrics()?)
    } else {
        None
    };

    logging::init_logging(&config)?;

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: Option<MetricsHandle>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
