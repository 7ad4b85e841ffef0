//! Prometheus counters for resolved queries and backend failures.
use exonerator_outcome::OutcomeKind;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    outcomes: IntCounterVec,
    backend_failures: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let outcomes = IntCounterVec::new(
            Opts::new("exonerator_outcomes_total", "Resolved queries by outcome"),
            &["outcome"],
        )?;
        let backend_failures = IntCounter::new(
            "exonerator_backend_failures_total",
            "Lookups that ended with the backend unreachable",
        )?;
        registry.register(Box::new(outcomes.clone()))?;
        registry.register(Box::new(backend_failures.clone()))?;

        // Export every outcome from the start, at zero.
        for kind in OutcomeKind::ALL {
            outcomes.with_label_values(&[kind.as_str()]);
        }

        Ok(Self {
            registry,
            outcomes,
            backend_failures,
        })
    }

    pub fn record_outcome(&self, kind: OutcomeKind) {
        self.outcomes.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn record_backend_failure(&self) {
        self.backend_failures.inc();
    }

    pub fn outcome_count(&self, kind: OutcomeKind) -> u64 {
        self.outcomes.with_label_values(&[kind.as_str()]).get()
    }

    pub fn backend_failure_count(&self) -> u64 {
        self.backend_failures.get()
    }

    /// Text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
