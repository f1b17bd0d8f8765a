//! Prometheus metrics for the Q&A core.
//!
//! All metrics follow the naming convention: `qna_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // VOTE METRICS
    // =========================================================================

    /// Votes accepted by the repository
    pub static ref VOTES_APPLIED: CounterVec = CounterVec::new(
        Opts::new("qna_votes_applied_total", "Votes applied to questions and answers"),
        &["target", "outcome"]  // target: question/answer, outcome: added/removed/flipped
    ).expect("metric creation failed");

    // =========================================================================
    // RESOLUTION / HELPFULNESS METRICS
    // =========================================================================

    /// Questions resolved by accepting an answer
    pub static ref ANSWERS_ACCEPTED: Counter = Counter::new(
        "qna_resolution_answers_accepted_total",
        "Total number of answers accepted"
    ).expect("metric creation failed");

    /// Helpful flag flips
    pub static ref HELPFUL_TOGGLES: Counter = Counter::new(
        "qna_helpful_toggles_total",
        "Total number of helpful flag toggles"
    ).expect("metric creation failed");

    // =========================================================================
    // THREAD METRICS
    // =========================================================================

    /// Answers and replies submitted
    pub static ref ANSWERS_SUBMITTED: CounterVec = CounterVec::new(
        Opts::new("qna_threads_answers_submitted_total", "Answers submitted"),
        &["kind"]  // kind: answer/reply
    ).expect("metric creation failed");

    /// Replies dropped by the thread assembler
    pub static ref ORPHAN_REPLIES: Counter = Counter::new(
        "qna_threads_orphan_replies_total",
        "Replies whose parent is not a top-level answer"
    ).expect("metric creation failed");

    // =========================================================================
    // REPOSITORY METRICS
    // =========================================================================

    /// Repository round trip latency
    pub static ref REPOSITORY_LATENCY: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "qna_repository_round_trip_seconds",
            "Time spent waiting for the repository"
        ).buckets(exponential_buckets(0.0005, 2.0, 14).expect("bucket layout")),
        &["operation"]
    ).expect("metric creation failed");

    /// Repository failures by operation
    pub static ref REPOSITORY_FAILURES: CounterVec = CounterVec::new(
        Opts::new("qna_repository_failures_total", "Failed repository round trips"),
        &["operation"]
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Intents rejected before reaching the repository
    pub static ref REJECTED_INTENTS: CounterVec = CounterVec::new(
        Opts::new("qna_rejected_intents_total", "Intents rejected by local validation"),
        &["reason"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(VOTES_APPLIED.clone()),
        Box::new(ANSWERS_ACCEPTED.clone()),
        Box::new(HELPFUL_TOGGLES.clone()),
        Box::new(ANSWERS_SUBMITTED.clone()),
        Box::new(ORPHAN_REPLIES.clone()),
        Box::new(REPOSITORY_LATENCY.clone()),
        Box::new(REPOSITORY_FAILURES.clone()),
        Box::new(REJECTED_INTENTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }

    /// Start a repository round trip timer for `operation`.
    pub fn round_trip(operation: &str) -> Self {
        Self::new(&REPOSITORY_LATENCY.with_label_values(&[operation]))
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
