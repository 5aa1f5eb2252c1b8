//! The application: root service and request dispatcher.

use std::io::Read;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{Result, RouterError};
use crate::method::HttpMethod;
use crate::path::MatchMode;
use crate::request::{decode_body, Environ, Request};
use crate::response::{Response, Status};
use crate::service::{Entry, Service};
use crate::table::{RouteSource, RouteTable};

/// Root of the registration tree and dispatcher for incoming requests.
///
/// The route table and the 404/405 template responses are built at most
/// once, on first use or by [`prepare`](App::prepare), and are shared
/// read-only afterwards. Concurrent first requests block on the same
/// initialization instead of racing.
///
/// ```
/// use std::io;
///
/// use serde_json::json;
/// use tomoyo::{get, App, Environ};
///
/// let app = App::new()
///     .service(get(r"/users/(?P<id>\d+)", |_req, params| {
///         json!({"id": params.get("id")})
///     }))
///     .unwrap();
///
/// let res = app.dispatch(&Environ::new("GET", "/users/42"), &mut io::empty()).unwrap();
/// assert_eq!(res.status.code, 200);
/// assert_eq!(res.body, r#"{"id": "42"}"#);
/// ```
#[derive(Debug)]
pub struct App<S = Service> {
    root: S,
    match_mode: MatchMode,
    route_table: OnceCell<RouteTable>,
    not_found: OnceCell<Arc<Response>>,
    method_not_allowed: OnceCell<Arc<Response>>,
}

impl App {
    /// Creates an application with no routes.
    pub fn new() -> Self {
        Self::from_source(Service::new())
    }

    /// Registers an entry at the root.
    ///
    /// Registration must be complete before the first dispatch; entries
    /// added after the route table was built are never routed.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicatePath`] on a taken root path.
    pub fn register(&mut self, entry: impl Into<Entry>) -> Result<&mut Self> {
        let entry = entry.into();
        if self.route_table.get().is_some() {
            warn!(path = entry.path(), "registered after the route table was built");
        }
        self.root.register(entry)?;
        Ok(self)
    }

    /// Registers an entry, consuming and returning the app for chaining.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicatePath`] on a taken root path.
    pub fn service(mut self, entry: impl Into<Entry>) -> Result<Self> {
        self.register(entry)?;
        Ok(self)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RouteSource> App<S> {
    /// Creates an application over any route source.
    pub fn from_source(root: S) -> Self {
        Self {
            root,
            match_mode: MatchMode::default(),
            route_table: OnceCell::new(),
            not_found: OnceCell::new(),
            method_not_allowed: OnceCell::new(),
        }
    }

    /// Sets how patterns are anchored against request paths.
    #[must_use]
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self.route_table = OnceCell::new();
        self
    }

    /// The root route source.
    pub fn root(&self) -> &S {
        &self.root
    }

    /// The flattened route table, built on first access.
    ///
    /// # Errors
    ///
    /// Returns the flattening or compilation error of the first attempt.
    /// A failed build is retried on the next call.
    pub fn route_table(&self) -> Result<&RouteTable> {
        self.route_table.get_or_try_init(|| {
            let table = RouteTable::build(self.root.flatten()?, self.match_mode)?;
            debug!(routes = table.len(), "route table built");
            Ok(table)
        })
    }

    /// Full patterns in matching order.
    ///
    /// # Errors
    ///
    /// Same as [`route_table`](Self::route_table).
    pub fn resource_paths(&self) -> Result<Vec<&str>> {
        Ok(self.route_table()?.patterns().collect())
    }

    /// The shared 404 response.
    pub fn not_found_response(&self) -> Arc<Response> {
        Arc::clone(
            self.not_found
                .get_or_init(|| Arc::new(Response::template(Status::NOT_FOUND))),
        )
    }

    /// The shared 405 response.
    pub fn method_not_allowed_response(&self) -> Arc<Response> {
        Arc::clone(
            self.method_not_allowed
                .get_or_init(|| Arc::new(Response::template(Status::METHOD_NOT_ALLOWED))),
        )
    }

    /// Builds the route table and both templates up front, so configuration
    /// errors surface before the first request.
    ///
    /// # Errors
    ///
    /// Same as [`route_table`](Self::route_table).
    pub fn prepare(&self) -> Result<()> {
        self.route_table()?;
        self.not_found_response();
        self.method_not_allowed_response();
        Ok(())
    }

    /// Dispatches one request.
    ///
    /// Parses the method, decodes the body, then routes to the first
    /// matching pattern. Unmatched paths get the 404 template and a match
    /// bound to another method gets the 405 template.
    ///
    /// # Errors
    ///
    /// Unknown method tokens, body decoding failures, route table errors and
    /// handler failures are returned as is.
    pub fn dispatch(&self, environ: &Environ, input: &mut dyn Read) -> Result<Arc<Response>> {
        let method: HttpMethod = environ.request_method.parse()?;
        let body = decode_body(method, environ, input)?;
        let path = environ.path_info.as_str();

        let Some((resource, params)) = self.route_table()?.find(path) else {
            debug!(%method, path, "no route matched");
            return Ok(self.not_found_response());
        };

        if !resource.is_allowed_method(method) {
            debug!(%method, path, pattern = resource.path(), "method not allowed");
            return Ok(self.method_not_allowed_response());
        }

        debug!(%method, path, pattern = resource.path(), "dispatching");
        let request = Request::new(environ.clone(), method, body);
        let reply = resource
            .call(request, params)
            .ok_or_else(|| RouterError::UnboundResource(resource.path().to_string()))??;

        Ok(Arc::new(Response::ok(reply)?))
    }
}
