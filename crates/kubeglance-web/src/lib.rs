//! HTTP dashboard for kubeglance
//!
//! Serves a single HTML page listing the pods of every kubeconfig context.
//! Requests are dispatched through an explicit table of path patterns and
//! the page is rendered with handlebars.

mod error;
mod render;
mod routes;
mod server;
mod view;

pub use error::WebError;
pub use render::Renderer;
pub use routes::{Handler, RouteMatch, RouteTable};
pub use server::{AppState, DEFAULT_TITLE, create_app_state, create_router, dashboard_routes, serve};
pub use view::{ContextView, NamespaceView, PageView, PodView};
