//! The route table.
//!
//! Routes are kept per method in registration order, and resolution returns the first
//! route whose pattern matches the whole path. Registration order is the only priority:
//! a broad pattern registered early shadows a more specific one registered later, and
//! registering an identical template twice leaves the second registration unreachable.
//!
//! ```
//! use http::Method;
//! use lean_web::router::Router;
//! use lean_web::{handler_fn, HandlerError, PathParams};
//! use lean_http::protocol::Request;
//!
//! async fn hello(_request: Request, params: PathParams) -> Result<String, HandlerError> {
//!     Ok(format!("Hello, {}!", params.get("who").unwrap_or_default()))
//! }
//!
//! let router = Router::builder().get("/hello/:who", handler_fn(hello)).build().unwrap();
//!
//! let matched = router.at(&Method::GET, "/hello/world").unwrap();
//! assert_eq!(matched.params().get("who"), Some("world"));
//! assert!(router.at(&Method::GET, "/hello/a/b").is_none());
//! ```

mod pattern;

pub use pattern::RouteError;

use crate::PathParams;
use crate::handler::RequestHandler;
use crate::static_files::StaticFiles;

use http::Method;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Main router structure that resolves `(method, path)` pairs to handlers
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
}

/// One registered route: the template it was built from, its compiled pattern and the
/// handler it dispatches to.
pub struct Route {
    template: String,
    pattern: Regex,
    handler: Box<dyn RequestHandler>,
}

/// Result of matching a route, containing the matched route and its path parameters
#[derive(Debug)]
pub struct RouteResult<'router> {
    route: &'router Route,
    params: PathParams,
}

impl Router {
    /// Creates a new, empty router builder
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Matches `path` against the routes registered for `method`, in registration
    /// order. Returns `None` when no pattern matches.
    pub fn at<'router>(&'router self, method: &Method, path: &str) -> Option<RouteResult<'router>> {
        self.routes.get(method)?.iter().find_map(|route| {
            let captures = route.pattern.captures(path)?;
            let params = route
                .pattern
                .capture_names()
                .flatten()
                .filter_map(|name| captures.name(name).map(|value| (name.to_string(), value.as_str().to_string())))
                .collect();
            Some(RouteResult { route, params })
        })
    }

    /// Total number of registered routes, across all methods.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (method, routes) in &self.routes {
            map.entry(method, &routes.iter().map(Route::template).collect::<Vec<_>>());
        }
        map.finish()
    }
}

impl Route {
    /// The template this route was registered with
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Gets the request handler for this route
    pub fn handler(&self) -> &dyn RequestHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("template", &self.template).field("pattern", &self.pattern.as_str()).finish_non_exhaustive()
    }
}

impl<'router> RouteResult<'router> {
    pub fn route(&self) -> &'router Route {
        self.route
    }

    /// Gets the path parameters from the matched route
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn into_parts(self) -> (&'router Route, PathParams) {
        (self.route, self.params)
    }
}

enum RouteKind {
    Template,
    StaticMount,
}

struct PendingRoute {
    method: Method,
    template: String,
    kind: RouteKind,
    handler: Box<dyn RequestHandler>,
}

/// Collects routes during the registration phase. [`RouterBuilder::build`] compiles
/// them into an immutable [`Router`].
pub struct RouterBuilder {
    routes: Vec<PendingRoute>,
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter().map(|route| (&route.method, &route.template))).finish()
    }
}

impl RouterBuilder {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route for `method`. Earlier registrations take priority.
    pub fn route(self, method: Method, template: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        self.push(method, template.into(), RouteKind::Template, Box::new(handler))
    }

    /// Serves the files below `root` for every `GET` path under `resource`.
    pub fn mount_static(self, resource: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let resource = resource.into();
        let handler = StaticFiles::new(resource.clone(), root);
        self.push(Method::GET, resource, RouteKind::StaticMount, Box::new(handler))
    }

    /// Builds the router, compiling every template.
    pub fn build(self) -> Result<Router, RouteError> {
        let mut routes: HashMap<Method, Vec<Route>> = HashMap::new();

        for PendingRoute { method, template, kind, handler } in self.routes {
            let pattern = match kind {
                RouteKind::Template => pattern::compile_template(&template)?,
                RouteKind::StaticMount => pattern::compile_prefix(&template)?,
            };
            routes.entry(method).or_default().push(Route { template, pattern, handler });
        }

        Ok(Router { routes })
    }

    fn push(mut self, method: Method, template: String, kind: RouteKind, handler: Box<dyn RequestHandler>) -> Self {
        info!("Add route {} {}", method, template);
        self.routes.push(PendingRoute { method, template, kind, handler });
        self
    }
}

macro_rules! method_route {
    ($fn_name:ident, $method:ident) => {
        impl RouterBuilder {
            pub fn $fn_name(self, template: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
                self.route(Method::$method, template, handler)
            }
        }
    };
}

method_route!(get, GET);
method_route!(post, POST);
method_route!(put, PUT);
method_route!(delete, DELETE);
method_route!(head, HEAD);
