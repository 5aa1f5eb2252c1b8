//! Request-side types: the transport snapshot, decoded bodies and path
//! parameters.

use std::collections::HashMap;
use std::io::Read;

use indexmap::IndexMap;

use crate::error::{Result, RouterError};
use crate::method::HttpMethod;

/// Snapshot of what the transport knows about one incoming request.
///
/// The request payload itself is not part of the snapshot; it is handed to
/// [`crate::App::dispatch`] as a separate byte stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ {
    /// Request path, without the query string.
    pub path_info: String,
    /// Raw method token from the request line.
    pub request_method: String,
    /// Raw query string, without the leading `?`.
    pub query_string: String,
    /// Raw `Content-Length` value, if the client sent one.
    pub content_length: Option<String>,
    /// Request headers as received.
    pub headers: Vec<(String, String)>,
}

impl Environ {
    /// Creates a snapshot for a method token and path.
    pub fn new(request_method: impl Into<String>, path_info: impl Into<String>) -> Self {
        Self {
            path_info: path_info.into(),
            request_method: request_method.into(),
            ..Self::default()
        }
    }

    /// Sets the query string.
    #[must_use]
    pub fn query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = query.into();
        self
    }

    /// Sets the raw content length.
    #[must_use]
    pub fn content_length(mut self, length: impl Into<String>) -> Self {
        self.content_length = Some(length.into());
        self
    }

    /// Appends a request header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Declared body length; missing or malformed values count as zero.
    pub fn body_length(&self) -> usize {
        self.content_length
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Form fields decoded from a query string or a form-encoded payload.
///
/// Each field maps to every value sent for it, in order. Pairs with an empty
/// value are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: IndexMap<String, Vec<String>>,
}

impl FormData {
    /// Decodes `application/x-www-form-urlencoded` bytes.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)?;
        let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            fields.entry(key).or_default().push(value);
        }
        Ok(Self { fields })
    }

    /// Gets the first value of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Gets every value of a field.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if no fields were decoded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Decodes the request body for a method.
///
/// GET reads the query string, POST reads up to the declared content length
/// from `input`. Other methods have no decoding.
pub fn decode_body(
    method: HttpMethod,
    environ: &Environ,
    input: &mut dyn Read,
) -> Result<FormData> {
    match method {
        HttpMethod::Get => FormData::parse(environ.query_string.as_bytes()),
        HttpMethod::Post => {
            let mut payload = Vec::new();
            input
                .take(environ.body_length() as u64)
                .read_to_end(&mut payload)?;
            FormData::parse(&payload)
        }
        HttpMethod::Put | HttpMethod::Delete => Err(RouterError::InvalidHttpMethod(method)),
    }
}

/// Path parameters captured by a route pattern's named groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: HashMap<String, String>,
}

impl PathParams {
    /// Creates new empty path params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A request as seen by a handler.
#[derive(Debug, Clone)]
pub struct Request {
    /// Transport snapshot the request arrived with.
    pub environ: Environ,
    /// Method the route was matched for.
    pub method: HttpMethod,
    /// Decoded query or form fields.
    pub body: FormData,
}

impl Request {
    /// Creates a request.
    pub fn new(environ: Environ, method: HttpMethod, body: FormData) -> Self {
        Self {
            environ,
            method,
            body,
        }
    }

    /// Request path.
    pub fn path(&self) -> &str {
        &self.environ.path_info
    }
}
