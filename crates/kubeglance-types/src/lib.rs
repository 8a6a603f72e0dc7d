//! Shared types for kubeglance
//!
//! This crate contains the data structures passed between the cluster
//! client, the aggregator and the web layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Kubernetes context information
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub user: String,
    pub namespace: Option<String>,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(
        name: String,
        cluster: String,
        user: String,
        namespace: Option<String>,
        is_current: bool,
    ) -> Self {
        Self {
            name,
            cluster,
            user,
            namespace,
            is_current,
        }
    }
}

/// Pod information, the unit of display on the dashboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: PodStatus,
    pub containers: Vec<ContainerInfo>,
    pub node_name: Option<String>,
    pub pod_ip: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl PodInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            status: PodStatus::Unknown,
            containers: Vec::new(),
            node_name: None,
            pod_ip: None,
            started_at: None,
        }
    }

    /// Format container readiness as "ready/total"
    pub fn ready_status(&self) -> String {
        let ready = self.containers.iter().filter(|c| c.ready).count();
        format!("{}/{}", ready, self.containers.len())
    }

    /// Sum of restarts across all containers
    pub fn restart_count(&self) -> i32 {
        self.containers.iter().map(|c| c.restart_count).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum PodStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<&str> for PodStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub name: String,
    pub ready: bool,
    pub restart_count: i32,
}

impl ContainerInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ready: false,
            restart_count: 0,
        }
    }
}

// ============================================================================
// Aggregation Types
// ============================================================================

/// Stage of an aggregation pass that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FailureKind {
    /// Building a client for the context failed
    Connect,
    /// Listing namespaces failed after connecting
    ListNamespaces,
    /// Listing pods in one namespace failed
    ListInstances,
    /// The context did not finish within the request deadline
    Timeout,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::ListNamespaces => "list-namespaces",
            Self::ListInstances => "list-instances",
            Self::Timeout => "timeout",
        }
    }

    /// Whether this failure empties the whole context snapshot
    pub fn is_context_wide(&self) -> bool {
        !matches!(self, Self::ListInstances)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failure recorded during an aggregation pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AggregationFailure {
    pub context: String,
    /// Set only for instance listing failures
    pub namespace: Option<String>,
    pub kind: FailureKind,
    pub message: String,
}

impl AggregationFailure {
    pub fn new(context: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            context: context.to_string(),
            namespace: None,
            kind,
            message: message.into(),
        }
    }

    pub fn in_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }
}

impl fmt::Display for AggregationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "[{}/{}] {}: {}", self.context, ns, self.kind, self.message),
            None => write!(f, "[{}] {}: {}", self.context, self.kind, self.message),
        }
    }
}

/// One context's listing at one point in time
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContextSnapshot {
    /// Context name as it appears in the kubeconfig
    pub context: String,

    /// Cluster the context points at, when known
    pub cluster: Option<String>,

    /// Namespace name to the pods found in it
    pub namespaces: BTreeMap<String, Vec<PodInfo>>,

    /// Failures hit while collecting this context
    pub failures: Vec<AggregationFailure>,
}

impl ContextSnapshot {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            cluster: None,
            namespaces: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Drop everything collected so far, keeping failures
    pub fn clear_namespaces(&mut self) {
        self.namespaces.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// True when nothing went wrong collecting this context
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when a context-wide failure emptied the snapshot
    pub fn is_unavailable(&self) -> bool {
        self.failures.iter().any(|f| f.kind.is_context_wide())
    }

    pub fn instance_count(&self) -> usize {
        self.namespaces.values().map(Vec::len).sum()
    }

    /// Namespace names mapped to pod names, in display order
    pub fn pod_names(&self) -> BTreeMap<&str, Vec<&str>> {
        self.namespaces
            .iter()
            .map(|(ns, pods)| (ns.as_str(), pods.iter().map(|p| p.name.as_str()).collect()))
            .collect()
    }
}

/// Result of one aggregation pass: one snapshot per context, in context order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub contexts: Vec<ContextSnapshot>,
}

impl AggregationResult {
    pub fn new(contexts: Vec<ContextSnapshot>) -> Self {
        Self { contexts }
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// All failures across every context, in the order they were hit
    pub fn failures(&self) -> impl Iterator<Item = &AggregationFailure> {
        self.contexts.iter().flat_map(|c| c.failures.iter())
    }

    pub fn instance_count(&self) -> usize {
        self.contexts.iter().map(ContextSnapshot::instance_count).sum()
    }
}
