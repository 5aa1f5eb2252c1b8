//! Resources: a path bound to one handler and one method.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::method::HttpMethod;
use crate::request::{PathParams, Request};
use crate::response::{IntoReply, Reply};

/// A boxed request handler.
pub type Handler = Arc<dyn Fn(Request, PathParams) -> Result<Reply> + Send + Sync>;

/// A single route: a path pattern, the handler and the method it accepts.
///
/// A fresh resource is unbound. Calling one of [`get`](Self::get),
/// [`post`](Self::post), [`put`](Self::put) or [`delete`](Self::delete)
/// binds the handler and method together; binding again replaces both.
///
/// ```
/// use tomoyo::{HttpMethod, Resource};
///
/// let resource = Resource::new("/hello").get(|_req, _params| "hello");
/// assert_eq!(resource.method(), Some(HttpMethod::Get));
/// ```
#[derive(Clone)]
pub struct Resource {
    path: String,
    binding: Option<(Handler, HttpMethod)>,
}

impl Resource {
    /// Creates an unbound resource.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            binding: None,
        }
    }

    /// Binds a GET handler.
    #[must_use]
    pub fn get<F, R>(self, handler: F) -> Self
    where
        F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.to(handler, HttpMethod::Get)
    }

    /// Binds a POST handler.
    #[must_use]
    pub fn post<F, R>(self, handler: F) -> Self
    where
        F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.to(handler, HttpMethod::Post)
    }

    /// Binds a PUT handler.
    #[must_use]
    pub fn put<F, R>(self, handler: F) -> Self
    where
        F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.to(handler, HttpMethod::Put)
    }

    /// Binds a DELETE handler.
    #[must_use]
    pub fn delete<F, R>(self, handler: F) -> Self
    where
        F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.to(handler, HttpMethod::Delete)
    }

    /// Binds a handler for any method.
    #[must_use]
    pub fn to<F, R>(mut self, handler: F, method: HttpMethod) -> Self
    where
        F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        let handler: Handler = Arc::new(move |req, params| handler(req, params).into_reply());
        self.binding = Some((handler, method));
        self
    }

    /// The path pattern, local to the service the resource is registered in.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The bound method, if any.
    pub fn method(&self) -> Option<HttpMethod> {
        self.binding.as_ref().map(|(_, m)| *m)
    }

    /// The bound handler, if any.
    pub fn handler(&self) -> Option<&Handler> {
        self.binding.as_ref().map(|(h, _)| h)
    }

    /// Returns true once a handler is bound.
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Returns true if `method` is the bound method.
    pub fn is_allowed_method(&self, method: HttpMethod) -> bool {
        self.method() == Some(method)
    }

    /// Calls the bound handler.
    ///
    /// Returns `None` if the resource is unbound.
    pub fn call(&self, request: Request, params: PathParams) -> Option<Result<Reply>> {
        self.handler().map(|handler| handler(request, params))
    }

    /// Copy of this resource under another path, sharing the handler.
    pub(crate) fn with_path(&self, path: String) -> Self {
        Self {
            path,
            binding: self.binding.clone(),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("method", &self.method())
            .finish_non_exhaustive()
    }
}

/// Creates a resource bound to a GET handler.
pub fn get<F, R>(path: impl Into<String>, handler: F) -> Resource
where
    F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    Resource::new(path).get(handler)
}

/// Creates a resource bound to a POST handler.
pub fn post<F, R>(path: impl Into<String>, handler: F) -> Resource
where
    F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    Resource::new(path).post(handler)
}

/// Creates a resource bound to a PUT handler.
pub fn put<F, R>(path: impl Into<String>, handler: F) -> Resource
where
    F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    Resource::new(path).put(handler)
}

/// Creates a resource bound to a DELETE handler.
pub fn delete<F, R>(path: impl Into<String>, handler: F) -> Resource
where
    F: Fn(Request, PathParams) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    Resource::new(path).delete(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Environ, FormData};

    fn request() -> Request {
        Request::new(Environ::new("GET", "/"), HttpMethod::Get, FormData::default())
    }

    #[test]
    fn test_unbound_resource() {
        let resource = Resource::new("/idle");
        assert!(!resource.is_bound());
        assert_eq!(resource.method(), None);
        assert!(resource.call(request(), PathParams::new()).is_none());
    }

    #[test]
    fn test_binding_sets_method_and_handler() {
        let resource = Resource::new("/items").post(|_req, _params| "created");
        assert!(resource.is_allowed_method(HttpMethod::Post));
        assert!(!resource.is_allowed_method(HttpMethod::Get));

        let reply = resource.call(request(), PathParams::new()).unwrap().unwrap();
        assert_eq!(reply, Reply::Text("created".to_string()));
    }

    #[test]
    fn test_last_binding_wins() {
        let resource = Resource::new("/items")
            .get(|_req, _params| "first")
            .delete(|_req, _params| "second");

        assert_eq!(resource.method(), Some(HttpMethod::Delete));
        let reply = resource.call(request(), PathParams::new()).unwrap().unwrap();
        assert_eq!(reply, Reply::Text("second".to_string()));
    }

    #[test]
    fn test_shortcut_constructors() {
        assert_eq!(get("/a", |_, _| "a").method(), Some(HttpMethod::Get));
        assert_eq!(post("/a", |_, _| "a").method(), Some(HttpMethod::Post));
        assert_eq!(put("/a", |_, _| "a").method(), Some(HttpMethod::Put));
        assert_eq!(delete("/a", |_, _| "a").method(), Some(HttpMethod::Delete));
    }
}
