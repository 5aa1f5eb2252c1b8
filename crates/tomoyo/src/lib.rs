//! # tomoyo
//!
//! A small synchronous HTTP router and dispatcher.
//!
//! This crate provides:
//! - Regex path patterns with named groups as path parameters
//! - One handler and one method per resource, bound with `get`/`post`/`put`/`delete`
//! - Nestable scopes that prefix every route beneath them
//! - First-match dispatch over a flattened, ordered route table
//! - Shared 404/405 template responses
//! - Text and JSON replies
//! - A hyper-based server for running an app
//!
//! ## Quick Start
//!
//! ```
//! use std::io;
//!
//! use serde_json::json;
//! use tomoyo::{get, post, App, Environ, Request, Scope};
//!
//! let api = Scope::new("/api")
//!     .service(get(r"/users/(?P<id>\d+)", |_req, params| {
//!         json!({"id": params.get("id")})
//!     }))?
//!     .service(post("/users", |req: Request, _params| {
//!         format!("created {}", req.body.get("name").unwrap_or("nobody"))
//!     }))?;
//!
//! let app = App::new()
//!     .service(get("/", |_req, _params| "hello"))?
//!     .service(api)?;
//!
//! let res = app.dispatch(&Environ::new("GET", "/api/users/42"), &mut io::empty())?;
//! assert_eq!(res.status.code, 200);
//! assert_eq!(res.body, r#"{"id": "42"}"#);
//! # Ok::<(), tomoyo::RouterError>(())
//! ```
//!
//! ## Matching
//!
//! Routes are tried in registration order, depth first through scopes, and
//! the first pattern that matches wins. By default a pattern only has to
//! match at the start of the path, so register more specific patterns first
//! or switch the app to [`MatchMode::Full`].
//!
//! ## Request bodies
//!
//! GET requests expose their query string and POST requests their
//! form-encoded payload as [`FormData`] in `request.body`. Dispatching a PUT
//! or DELETE request fails with [`RouterError::InvalidHttpMethod`].
//!
//! ## Serving
//!
//! ```ignore
//! use tomoyo::{App, Server};
//!
//! let app = App::new().service(tomoyo::get("/", |_, _| "hello"))?;
//! Server::new(app).bind("127.0.0.1", 8000).run().await?;
//! ```

mod app;
mod error;
mod header;
mod method;
mod path;
mod request;
mod resource;
mod response;
pub mod server;
mod service;
mod table;

pub use app::App;
pub use error::{BoxError, Result, RouterError};
pub use header::{canonical_header_name, HttpHeader};
pub use method::HttpMethod;
pub use path::{MatchMode, PathPattern};
pub use request::{decode_body, Environ, FormData, PathParams, Request};
pub use resource::{delete, get, post, put, Handler, Resource};
pub use response::{to_json_string, IntoReply, Reply, Response, Status};
pub use server::Server;
pub use service::{Entry, Scope, Service};
pub use table::{Route, RouteSource, RouteTable};
