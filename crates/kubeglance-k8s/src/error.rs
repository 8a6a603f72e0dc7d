use thiserror::Error;

/// Result type alias for K8s operations.
pub type K8sResult<T> = Result<T, K8sError>;

/// Errors that can occur talking to a cluster.
#[derive(Error, Debug)]
pub enum K8sError {
    #[error("Failed to read kubeconfig: {message}")]
    Kubeconfig { message: String },

    #[error("Context not found in kubeconfig: {name}")]
    ContextNotFound { name: String },

    #[error("Failed to connect to context {context}: {message}")]
    Connect { context: String, message: String },

    #[error("Failed to list namespaces: {message}")]
    ListNamespaces { message: String },

    #[error("Failed to list pods in {namespace}: {message}")]
    ListPods { namespace: String, message: String },
}

impl From<kube::config::KubeconfigError> for K8sError {
    fn from(err: kube::config::KubeconfigError) -> Self {
        K8sError::Kubeconfig {
            message: err.to_string(),
        }
    }
}
