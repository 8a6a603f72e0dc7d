//! Display model built from an aggregation result.
//!
//! Every optional value is flattened to a string here so the template only
//! ever touches fields that exist.

use serde::Serialize;

use kubeglance_types::{AggregationResult, ContextSnapshot, PodInfo};

const MISSING: &str = "-";

#[derive(Clone, Debug, Serialize)]
pub struct PageView {
    pub title: String,
    pub contexts: Vec<ContextView>,
    pub pod_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ContextView {
    pub name: String,
    pub cluster: String,
    pub unavailable: bool,
    pub failures: Vec<String>,
    pub namespaces: Vec<NamespaceView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NamespaceView {
    pub name: String,
    pub pods: Vec<PodView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PodView {
    pub name: String,
    pub status: &'static str,
    pub ready: String,
    pub restarts: i32,
    pub node: String,
    pub ip: String,
    pub started: String,
}

impl PageView {
    pub fn new(title: &str, result: &AggregationResult) -> Self {
        Self {
            title: title.to_string(),
            contexts: result.contexts.iter().map(ContextView::from).collect(),
            pod_count: result.instance_count(),
        }
    }
}

impl From<&ContextSnapshot> for ContextView {
    fn from(snapshot: &ContextSnapshot) -> Self {
        Self {
            name: snapshot.context.clone(),
            cluster: snapshot
                .cluster
                .clone()
                .unwrap_or_else(|| MISSING.to_string()),
            unavailable: snapshot.is_unavailable(),
            failures: snapshot.failures.iter().map(ToString::to_string).collect(),
            namespaces: snapshot
                .namespaces
                .iter()
                .map(|(name, pods)| NamespaceView {
                    name: name.clone(),
                    pods: pods.iter().map(PodView::from).collect(),
                })
                .collect(),
        }
    }
}

impl From<&PodInfo> for PodView {
    fn from(pod: &PodInfo) -> Self {
        Self {
            name: pod.name.clone(),
            status: pod.status.as_str(),
            ready: pod.ready_status(),
            restarts: pod.restart_count(),
            node: pod.node_name.clone().unwrap_or_else(|| MISSING.to_string()),
            ip: pod.pod_ip.clone().unwrap_or_else(|| MISSING.to_string()),
            started: pod
                .started_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeglance_types::{AggregationFailure, FailureKind, PodStatus};

    #[test]
    fn test_page_view_flattens_snapshots() {
        let mut pod = PodInfo::new("web-1".to_string(), "default".to_string());
        pod.status = PodStatus::Running;
        pod.node_name = Some("node-a".to_string());

        let mut dev = ContextSnapshot::new("dev");
        dev.cluster = Some("dev-cluster".to_string());
        dev.namespaces.insert("default".to_string(), vec![pod]);
        let mut prod = ContextSnapshot::new("prod");
        prod.failures
            .push(AggregationFailure::new("prod", FailureKind::Connect, "refused"));

        let page = PageView::new("pods", &AggregationResult::new(vec![dev, prod]));

        assert_eq!(page.pod_count, 1);
        assert_eq!(page.contexts[0].name, "dev");
        assert_eq!(page.contexts[0].cluster, "dev-cluster");
        assert_eq!(page.contexts[1].cluster, "-");
        assert!(!page.contexts[0].unavailable);

        let web = &page.contexts[0].namespaces[0].pods[0];
        assert_eq!(web.status, "Running");
        assert_eq!(web.node, "node-a");
        assert_eq!(web.ip, "-");
        assert_eq!(web.ready, "0/0");

        assert!(page.contexts[1].unavailable);
        assert_eq!(page.contexts[1].failures, vec!["[prod] connect: refused"]);
    }
}
