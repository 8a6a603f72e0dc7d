//! Contracts between the aggregator and a cluster backend.

use async_trait::async_trait;

use crate::error::K8sResult;
use kubeglance_types::PodInfo;

/// Produces a connection handle for one kubeconfig context.
///
/// A handle lives for the duration of one context's collection and is
/// dropped afterwards; nothing is pooled across contexts or requests.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    type Handle: NamespaceLister + InstanceLister;

    /// Connect to `context`. No retry; a failure is reported once.
    async fn connect(&self, context: &str) -> K8sResult<Self::Handle>;
}

/// Lists the namespaces visible through a handle.
#[async_trait]
pub trait NamespaceLister: Send + Sync {
    /// Namespace names at the time of the call. An error invalidates the
    /// whole listing.
    async fn list_namespaces(&self) -> K8sResult<Vec<String>>;
}

/// Lists the pods of one namespace.
#[async_trait]
pub trait InstanceLister: Send + Sync {
    async fn list_instances(&self, namespace: &str) -> K8sResult<Vec<PodInfo>>;
}
