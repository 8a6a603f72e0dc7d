use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use kubeglance_k8s::{K8sResult, KubeConnector};
use kubeglance_types::{AggregationResult, ContextInfo};

use crate::aggregator::Aggregator;
use crate::sink::{FailureSink, TracingSink};

/// Source of a fresh aggregation for each dashboard request
#[async_trait]
pub trait Dashboard: Send + Sync {
    async fn collect(&self) -> K8sResult<AggregationResult>;
}

/// Aggregates every context of a kubeconfig, re-reading the file on each call
pub struct KubeDashboard {
    /// Explicit kubeconfig path; kube's default lookup when unset
    kubeconfig: Option<PathBuf>,
    context_timeout: Option<Duration>,
    sink: Arc<dyn FailureSink>,
}

impl KubeDashboard {
    pub fn new(kubeconfig: Option<PathBuf>) -> Self {
        Self {
            kubeconfig,
            context_timeout: None,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_context_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.context_timeout = timeout;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }
}

#[async_trait]
impl Dashboard for KubeDashboard {
    async fn collect(&self) -> K8sResult<AggregationResult> {
        let connector = KubeConnector::load(self.kubeconfig.as_deref())?;
        let contexts = connector.get_contexts();
        let names: Vec<String> = contexts.iter().map(|c| c.name.clone()).collect();
        tracing::debug!(contexts = ?names, "loaded kubeconfig contexts");

        let aggregator = Aggregator::new(connector)
            .with_sink(Arc::clone(&self.sink))
            .with_context_timeout(self.context_timeout);

        let mut result = aggregator.aggregate(&names).await;
        label_clusters(&mut result, &contexts);
        tracing::info!(
            contexts = result.len(),
            pods = result.instance_count(),
            failures = result.failures().count(),
            "aggregation pass finished"
        );

        Ok(result)
    }
}

/// Attach each context's cluster name to its snapshot
fn label_clusters(result: &mut AggregationResult, contexts: &[ContextInfo]) {
    for snapshot in &mut result.contexts {
        snapshot.cluster = contexts
            .iter()
            .find(|c| c.name == snapshot.context)
            .map(|c| c.cluster.clone())
            .filter(|cluster| !cluster.is_empty());
    }
}
