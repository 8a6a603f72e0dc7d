//! Kubernetes client for kubeglance
//!
//! This crate defines the connect/list contracts the aggregator drives and
//! their kube-rs implementation: one client per kubeconfig context,
//! namespace listing, and pod listing per namespace.

mod client;
mod error;
mod provider;

pub use client::{ClusterHandle, KubeConnector};
pub use error::{K8sError, K8sResult};
pub use provider::{ConnectionProvider, InstanceLister, NamespaceLister};

// Re-export types that are used in our public API
pub use kubeglance_types::{ContainerInfo, ContextInfo, PodInfo, PodStatus};
