use std::path::Path;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::Api;
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};

use crate::error::{K8sError, K8sResult};
use crate::provider::{ConnectionProvider, InstanceLister, NamespaceLister};
use kubeglance_types::{ContainerInfo, ContextInfo, PodInfo, PodStatus};

/// Builds kube clients for the contexts of one parsed kubeconfig
#[derive(Clone)]
pub struct KubeConnector {
    kubeconfig: Kubeconfig,
    current_context: Option<String>,
}

impl KubeConnector {
    /// Load the kubeconfig from `path`, or from the default location
    /// (`KUBECONFIG`, then `~/.kube/config`) when no path is given
    pub fn load(path: Option<&Path>) -> K8sResult<Self> {
        let kubeconfig = match path {
            Some(path) => Kubeconfig::read_from(path).map_err(|e| K8sError::Kubeconfig {
                message: format!("{}: {}", path.display(), e),
            })?,
            None => Kubeconfig::read()?,
        };

        Ok(Self::from_kubeconfig(kubeconfig))
    }

    pub fn from_kubeconfig(kubeconfig: Kubeconfig) -> Self {
        let current_context = kubeconfig.current_context.clone();
        Self {
            kubeconfig,
            current_context,
        }
    }

    /// Get all contexts from the kubeconfig, in file order
    pub fn get_contexts(&self) -> Vec<ContextInfo> {
        self.kubeconfig
            .contexts
            .iter()
            .map(|ctx| {
                let context = ctx.context.as_ref();
                ContextInfo::new(
                    ctx.name.clone(),
                    context.map(|c| c.cluster.clone()).unwrap_or_default(),
                    context.and_then(|c| c.user.clone()).unwrap_or_default(),
                    context.and_then(|c| c.namespace.clone()),
                    Some(&ctx.name) == self.current_context.as_ref(),
                )
            })
            .collect()
    }

    /// Create a kube::Client for a specific context
    pub async fn client_for_context(&self, context_name: &str) -> K8sResult<kube::Client> {
        if !self.kubeconfig.contexts.iter().any(|c| c.name == context_name) {
            return Err(K8sError::ContextNotFound {
                name: context_name.to_string(),
            });
        }

        let connect_err = |message: String| K8sError::Connect {
            context: context_name.to_string(),
            message,
        };

        let config = kube::Config::from_custom_kubeconfig(
            self.kubeconfig.clone(),
            &KubeConfigOptions {
                context: Some(context_name.to_string()),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| connect_err(e.to_string()))?;

        kube::Client::try_from(config).map_err(|e| connect_err(e.to_string()))
    }
}

#[async_trait]
impl ConnectionProvider for KubeConnector {
    type Handle = ClusterHandle;

    async fn connect(&self, context: &str) -> K8sResult<ClusterHandle> {
        let client = self.client_for_context(context).await?;
        tracing::debug!(context, "connected");
        Ok(ClusterHandle { client })
    }
}

/// A live client scoped to one context
pub struct ClusterHandle {
    client: kube::Client,
}

#[async_trait]
impl NamespaceLister for ClusterHandle {
    async fn list_namespaces(&self) -> K8sResult<Vec<String>> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces
            .list(&ListParams::default())
            .await
            .map_err(|e| K8sError::ListNamespaces {
                message: e.to_string(),
            })?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }
}

#[async_trait]
impl InstanceLister for ClusterHandle {
    async fn list_instances(&self, namespace: &str) -> K8sResult<Vec<PodInfo>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| K8sError::ListPods {
                namespace: namespace.to_string(),
                message: e.to_string(),
            })?;

        Ok(list
            .items
            .into_iter()
            .map(|pod| pod_to_info(pod, namespace))
            .collect())
    }
}

/// Convert a k8s Pod to PodInfo
fn pod_to_info(pod: Pod, namespace: &str) -> PodInfo {
    let name = pod.metadata.name.unwrap_or_default();
    let mut info = PodInfo::new(name, namespace.to_string());

    if let Some(spec) = &pod.spec {
        info.node_name = spec.node_name.clone();
    }

    if let Some(status) = pod.status {
        info.pod_ip = status.pod_ip;
        info.started_at = status.start_time.map(|t| t.0);
        info.status = status
            .phase
            .as_deref()
            .map(PodStatus::from)
            .unwrap_or(PodStatus::Unknown);

        if let Some(container_statuses) = status.container_statuses {
            info.containers = container_statuses
                .into_iter()
                .map(|cs| {
                    let mut container = ContainerInfo::new(cs.name);
                    container.ready = cs.ready;
                    container.restart_count = cs.restart_count;
                    container
                })
                .collect();
        }
    }

    info
}
