use parking_lot::Mutex;

use kubeglance_types::AggregationFailure;

/// Receives every failure hit during an aggregation pass
pub trait FailureSink: Send + Sync {
    fn record(&self, failure: &AggregationFailure);
}

/// Logs failures as structured `warn` events
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, failure: &AggregationFailure) {
        tracing::warn!(
            context = %failure.context,
            namespace = failure.namespace.as_deref().unwrap_or("-"),
            kind = %failure.kind,
            error = %failure.message,
            "aggregation step failed"
        );
    }
}

/// Keeps failures in memory so callers can inspect them
#[derive(Debug, Default)]
pub struct MemorySink {
    failures: Mutex<Vec<AggregationFailure>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn failures(&self) -> Vec<AggregationFailure> {
        self.failures.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }
}

impl FailureSink for MemorySink {
    fn record(&self, failure: &AggregationFailure) {
        self.failures.lock().push(failure.clone());
    }
}
