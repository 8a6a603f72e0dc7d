//! Ordered path-pattern dispatch.
//!
//! Each entry pairs an anchored regex with a handler; the first pattern
//! that matches the request path wins and anything unmatched is a 404.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::response::Response;
use futures::future::BoxFuture;
use regex::Regex;

use crate::error::WebError;

/// A boxed async handler taking the shared state and the matched path
pub type Handler<S> =
    Arc<dyn Fn(S, RouteMatch) -> BoxFuture<'static, Result<Response, WebError>> + Send + Sync>;

/// The path a route matched, with its named captures
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteMatch {
    pub path: String,
    pub captures: HashMap<String, String>,
}

impl RouteMatch {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures.get(name).map(String::as_str)
    }
}

struct Route<S> {
    pattern: Regex,
    handler: Handler<S>,
}

/// Path pattern to handler table
pub struct RouteTable<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for RouteTable<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S> RouteTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route; earlier routes take precedence
    pub fn route<H, Fut>(mut self, pattern: &str, handler: H) -> Result<Self, regex::Error>
    where
        S: 'static,
        H: Fn(S, RouteMatch) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, WebError>> + Send + 'static,
    {
        let pattern = Regex::new(pattern)?;
        let handler: Handler<S> = Arc::new(
            move |state: S, matched: RouteMatch| -> BoxFuture<'static, Result<Response, WebError>> {
                Box::pin(handler(state, matched))
            },
        );
        self.routes.push(Route { pattern, handler });
        Ok(self)
    }

    /// Find the first route matching `path`
    pub fn resolve(&self, path: &str) -> Option<(Handler<S>, RouteMatch)> {
        self.routes.iter().find_map(|route| {
            let caps = route.pattern.captures(path)?;
            let captures = route
                .pattern
                .capture_names()
                .flatten()
                .filter_map(|name| Some((name.to_string(), caps.name(name)?.as_str().to_string())))
                .collect();

            Some((
                Arc::clone(&route.handler),
                RouteMatch {
                    path: path.to_string(),
                    captures,
                },
            ))
        })
    }

    /// Patterns in precedence order
    pub fn patterns(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.pattern.as_str()).collect()
    }
}
