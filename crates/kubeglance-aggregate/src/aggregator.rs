use std::sync::Arc;
use std::time::Duration;

use kubeglance_k8s::{ConnectionProvider, InstanceLister, NamespaceLister};
use kubeglance_types::{AggregationFailure, AggregationResult, ContextSnapshot, FailureKind};

use crate::sink::{FailureSink, TracingSink};

/// Drives a connection provider across many contexts and assembles the
/// per-context namespace/pod listing
pub struct Aggregator<P> {
    provider: P,

    /// Where failures are reported in addition to the snapshot itself
    sink: Arc<dyn FailureSink>,

    /// Upper bound on the time spent collecting one context
    context_timeout: Option<Duration>,
}

impl<P: ConnectionProvider> Aggregator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            sink: Arc::new(TracingSink),
            context_timeout: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_context_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.context_timeout = timeout;
        self
    }

    /// Collect every context in order. Never fails: a context that cannot be
    /// reached still gets its (empty) slot in the result.
    pub async fn aggregate(&self, contexts: &[String]) -> AggregationResult {
        let mut snapshots = Vec::with_capacity(contexts.len());

        for context in contexts {
            tracing::debug!(context = %context, "collecting context");
            snapshots.push(self.snapshot_context(context).await);
        }

        AggregationResult::new(snapshots)
    }

    async fn snapshot_context(&self, context: &str) -> ContextSnapshot {
        let mut snapshot = ContextSnapshot::new(context);

        match self.context_timeout {
            Some(limit) => {
                let collected =
                    tokio::time::timeout(limit, self.collect(context, &mut snapshot)).await;
                if collected.is_err() {
                    snapshot.clear_namespaces();
                    self.fail(
                        &mut snapshot,
                        AggregationFailure::new(
                            context,
                            FailureKind::Timeout,
                            format!("no response within {}s", limit.as_secs_f64()),
                        ),
                    );
                }
            }
            None => self.collect(context, &mut snapshot).await,
        }

        snapshot
    }

    async fn collect(&self, context: &str, snapshot: &mut ContextSnapshot) {
        let handle = match self.provider.connect(context).await {
            Ok(handle) => handle,
            Err(e) => {
                self.fail(
                    snapshot,
                    AggregationFailure::new(context, FailureKind::Connect, e.to_string()),
                );
                return;
            }
        };

        let names = match handle.list_namespaces().await {
            Ok(names) => names,
            Err(e) => {
                self.fail(
                    snapshot,
                    AggregationFailure::new(context, FailureKind::ListNamespaces, e.to_string()),
                );
                return;
            }
        };

        for name in names {
            match handle.list_instances(&name).await {
                Ok(pods) => {
                    snapshot.namespaces.insert(name, pods);
                }
                Err(e) => self.fail(
                    snapshot,
                    AggregationFailure::new(context, FailureKind::ListInstances, e.to_string())
                        .in_namespace(&name),
                ),
            }
        }
    }

    fn fail(&self, snapshot: &mut ContextSnapshot, failure: AggregationFailure) {
        self.sink.record(&failure);
        snapshot.failures.push(failure);
    }
}
