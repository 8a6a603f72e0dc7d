use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Response};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use kubeglance_aggregate::Dashboard;

use crate::error::WebError;
use crate::render::Renderer;
use crate::routes::{RouteMatch, RouteTable};
use crate::view::PageView;

/// Page title used when none is configured
pub const DEFAULT_TITLE: &str = "pods";

const ROOT_PATTERN: &str = "^/$";
const PAGE_PATTERN: &str = r"^/(?P<action>edit|save|view)/(?P<id>[a-zA-Z0-9]+)$";

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<dyn Dashboard>,
    pub renderer: Arc<Renderer>,
    pub title: Arc<str>,
    pub routes: Arc<RouteTable<AppState>>,
}

/// The dashboard route table. The page pattern is recognized but has no
/// behavior of its own; it renders the same dashboard as `/`.
pub fn dashboard_routes() -> Result<RouteTable<AppState>, WebError> {
    Ok(RouteTable::new()
        .route(ROOT_PATTERN, dashboard_page)?
        .route(PAGE_PATTERN, dashboard_page)?)
}

pub fn create_app_state(
    dashboard: Arc<dyn Dashboard>,
    renderer: Renderer,
    title: &str,
) -> Result<AppState, WebError> {
    let routes = dashboard_routes()?;
    tracing::debug!(patterns = ?routes.patterns(), "route table ready");

    Ok(AppState {
        dashboard,
        renderer: Arc::new(renderer),
        title: Arc::from(title),
        routes: Arc::new(routes),
    })
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn dispatch(State(state): State<AppState>, uri: Uri) -> Result<Response, WebError> {
    let Some((handler, matched)) = state.routes.resolve(uri.path()) else {
        tracing::debug!(path = %uri.path(), "no route");
        return Err(WebError::NotFound);
    };

    handler(state, matched).await
}

async fn dashboard_page(state: AppState, matched: RouteMatch) -> Result<Response, WebError> {
    tracing::debug!(path = %matched.path, "rendering dashboard");

    let result = state.dashboard.collect().await?;
    let html = state.renderer.render(&PageView::new(&state.title, &result))?;

    Ok(Html(html).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use kubeglance_k8s::{K8sError, K8sResult};
    use kubeglance_types::{AggregationResult, ContextSnapshot, PodInfo};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    #[derive(Default)]
    struct StubDashboard {
        broken: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Dashboard for StubDashboard {
        async fn collect(&self) -> K8sResult<AggregationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(K8sError::Kubeconfig {
                    message: "secret path /root/.kube/config".to_string(),
                });
            }

            let mut dev = ContextSnapshot::new("dev");
            dev.namespaces.insert(
                "default".to_string(),
                vec![PodInfo::new("web-1".to_string(), "default".to_string())],
            );
            Ok(AggregationResult::new(vec![dev, ContextSnapshot::new("prod")]))
        }
    }

    fn app(dashboard: Arc<StubDashboard>, renderer: Renderer) -> Router {
        create_router(create_app_state(dashboard, renderer, DEFAULT_TITLE).unwrap())
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_triggers_aggregation() {
        let dashboard = Arc::new(StubDashboard::default());
        let app = app(dashboard.clone(), Renderer::new().unwrap());

        let (status, body) = send(app, Method::GET, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("web-1"));
        assert!(body.contains("<title>pods</title>"));
        assert_eq!(dashboard.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disallowed_path_is_not_found() {
        let dashboard = Arc::new(StubDashboard::default());
        let app = app(dashboard.clone(), Renderer::new().unwrap());

        let (status, body) = send(app, Method::GET, "/bogus/xyz!").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "404 page not found\n");
        assert_eq!(dashboard.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_page_pattern_renders_dashboard() {
        let dashboard = Arc::new(StubDashboard::default());

        let (status, _) = send(
            app(dashboard.clone(), Renderer::new().unwrap()),
            Method::GET,
            "/view/abc123",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            app(dashboard.clone(), Renderer::new().unwrap()),
            Method::GET,
            "/view/abc-123",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(dashboard.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_any_method_is_dispatched() {
        let dashboard = Arc::new(StubDashboard::default());
        let (status, _) = send(
            app(dashboard, Renderer::new().unwrap()),
            Method::POST,
            "/",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_render_failure_is_generic_server_error() {
        let dashboard = Arc::new(StubDashboard::default());
        let renderer = Renderer::with_template("<p>{{not_a_field}}</p>").unwrap();

        let (status, body) = send(app(dashboard, renderer), Method::GET, "/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error\n");
        assert!(!body.contains("<p>"));
    }

    #[tokio::test]
    async fn test_dashboard_failure_hides_details() {
        let dashboard = Arc::new(StubDashboard {
            broken: true,
            ..Default::default()
        });

        let (status, body) = send(
            app(dashboard, Renderer::new().unwrap()),
            Method::GET,
            "/",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("/root/.kube/config"));
    }

    #[test]
    fn test_default_route_table() {
        let routes = dashboard_routes().unwrap();
        assert_eq!(routes.patterns(), vec![ROOT_PATTERN, PAGE_PATTERN]);
    }
}
