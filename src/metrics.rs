//! Metrics for declined deprecated API requests.
//!
//! Provides Prometheus metrics for auditing which deprecated endpoints are
//! still being called.

use prometheus::{IntCounterVec, IntGauge, Opts, Registry};

/// Methods recorded under their own label value.
const STANDARD_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// Label value for every extension method.
pub const OTHER_METHOD: &str = "OTHER";

/// Metrics collector for the deprecation gate.
#[derive(Clone)]
pub struct GateMetrics {
    /// Registry for all metrics
    registry: Registry,

    /// Counter for declined requests, by matched pattern and request method
    pub declined_total: IntCounterVec,

    /// Number of configured deprecation patterns
    pub patterns: IntGauge,
}

impl GateMetrics {
    /// Create a new metrics collector with the given prefix.
    pub fn new(prefix: &str) -> Self {
        let registry = Registry::new();

        let declined_total = IntCounterVec::new(
            Opts::new(
                format!("{}_declined_total", prefix),
                "Total number of requests declined because they hit a deprecated endpoint",
            ),
            &["pattern", "method"],
        )
        .expect("Failed to create declined_total metric");

        let patterns = IntGauge::with_opts(Opts::new(
            format!("{}_patterns", prefix),
            "Number of configured deprecated endpoint patterns",
        ))
        .expect("Failed to create patterns metric");

        registry
            .register(Box::new(declined_total.clone()))
            .expect("Failed to register declined_total");
        registry
            .register(Box::new(patterns.clone()))
            .expect("Failed to register patterns");

        Self {
            registry,
            declined_total,
            patterns,
        }
    }

    /// Record a declined request. Extension methods are counted under
    /// [`OTHER_METHOD`] so the label set stays bounded.
    pub fn record_declined(&self, pattern: &str, method: &str) {
        self.declined_total
            .with_label_values(&[pattern, method_label(method)])
            .inc();
    }

    pub fn set_patterns(&self, count: usize) {
        self.patterns.set(count as i64);
    }

    /// Get the Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode metrics in Prometheus text format.
    pub fn encode(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

fn method_label(method: &str) -> &str {
    STANDARD_METHODS
        .iter()
        .find(|m| m.eq_ignore_ascii_case(method))
        .copied()
        .unwrap_or(OTHER_METHOD)
}

impl Default for GateMetrics {
    fn default() -> Self {
        Self::new("deprecated_api")
    }
}
