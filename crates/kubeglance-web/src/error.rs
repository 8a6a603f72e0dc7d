use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kubeglance_k8s::K8sError;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("not found")]
    NotFound,
    #[error("failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("failed to load template: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("invalid route pattern: {0}")]
    Route(#[from] regex::Error),
    #[error("failed to collect dashboard: {0}")]
    Dashboard(#[from] K8sError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound => (StatusCode::NOT_FOUND, "404 page not found\n").into_response(),
            other => {
                // details stay in the log, the client gets a generic failure
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n").into_response()
            }
        }
    }
}
