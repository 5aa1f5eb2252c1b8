//! Error types for routing and dispatch.

use thiserror::Error;

use crate::method::HttpMethod;

/// Boxed error returned by a failing handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Router-specific errors.
///
/// Registration errors (`DuplicatePath`, `EmptyRouteTree`, `UnboundResource`,
/// `InvalidPattern`) are programming mistakes and should abort startup. The
/// remaining variants are raised per request and propagate to the transport.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Two entries registered under the same local path in one service.
    #[error("path already registered: {0}")]
    DuplicatePath(String),

    /// The application has no registered entries to route to.
    #[error("route tree is empty")]
    EmptyRouteTree,

    /// A resource was registered without binding a handler.
    #[error("resource has no bound handler: {0}")]
    UnboundResource(String),

    /// A route pattern failed to compile.
    #[error("invalid path pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The full pattern that failed.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// The transport supplied a method token outside the supported verbs.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// Body decoding is undefined for this method.
    #[error("no request body decoding for method {0}")]
    InvalidHttpMethod(HttpMethod),

    /// Reading the request body failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The request body is not valid form data.
    #[error("form decoding error: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// A handler reply could not be rendered as JSON.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// The handler itself failed.
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),

    /// The server address could not be parsed.
    #[error("invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
