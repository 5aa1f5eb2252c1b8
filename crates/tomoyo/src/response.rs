//! Response types and handler reply encoding.

use std::fmt;
use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;

use crate::error::{BoxError, Result, RouterError};
use crate::header::HttpHeader;

/// An HTTP status: numeric code plus reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    /// Numeric status code.
    pub code: u16,
    /// Reason phrase.
    pub reason: &'static str,
}

impl Status {
    /// 200 OK
    pub const OK: Self = Self::new(200, "OK");
    /// 404 Not Found
    pub const NOT_FOUND: Self = Self::new(404, "Not Found");
    /// 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: Self = Self::new(405, "Method Not Allowed");
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(500, "Internal Server Error");

    /// Creates a status.
    pub const fn new(code: u16, reason: &'static str) -> Self {
        Self { code, reason }
    }
}

/// Renders as a status line fragment, e.g. `404 Not Found`.
impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason)
    }
}

/// An HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response headers.
    pub headers: HttpHeader,
    /// Response status.
    pub status: Status,
    /// Response body.
    pub body: String,
}

impl Response {
    /// Creates a response with explicit parts.
    pub fn new(headers: HttpHeader, status: Status, body: impl Into<String>) -> Self {
        Self {
            headers,
            status,
            body: body.into(),
        }
    }

    /// Creates a plain-text response whose body is the status message.
    pub fn template(status: Status) -> Self {
        Self::with_body(status, "text/plain", status.to_string())
    }

    /// Creates a 200 response from a handler reply.
    pub fn ok(reply: Reply) -> Result<Self> {
        let (content_type, body) = match reply {
            Reply::Text(text) => ("text/plain", text),
            Reply::Json(value) => ("application/json", to_json_string(&value)?),
        };
        Ok(Self::with_body(Status::OK, content_type, body))
    }

    fn with_body(status: Status, content_type: &str, body: String) -> Self {
        let headers = HttpHeader::new()
            .with("content_type", content_type)
            .with("content_length", body.len().to_string());
        Self::new(headers, status, body)
    }

    /// Status line as handed to the transport.
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }

    /// Header pairs with canonical names.
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers.as_key_value_pairs()
    }

    /// Body bytes as handed to the transport.
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }
}

/// What a handler produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Rendered as `text/plain`.
    Text(String),
    /// Rendered as `application/json`.
    Json(Value),
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Only objects become JSON; a string is sent as its text and any other
/// value as its JSON text under `text/plain`.
impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(_) => Self::Json(value),
            Value::String(text) => Self::Text(text),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Conversion from a handler's return value into a [`Reply`].
///
/// Strings become text and JSON objects become JSON. A `Result` lets a
/// handler fail; its error surfaces from dispatch as
/// [`RouterError::Handler`].
pub trait IntoReply {
    /// Performs the conversion.
    fn into_reply(self) -> Result<Reply>;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Result<Reply> {
        Ok(self)
    }
}

impl IntoReply for String {
    fn into_reply(self) -> Result<Reply> {
        Ok(Reply::Text(self))
    }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> Result<Reply> {
        Ok(Reply::Text(self.to_string()))
    }
}

impl IntoReply for Value {
    fn into_reply(self) -> Result<Reply> {
        Ok(Reply::from(self))
    }
}

impl<T, E> IntoReply for std::result::Result<T, E>
where
    T: IntoReply,
    E: Into<BoxError>,
{
    fn into_reply(self) -> Result<Reply> {
        self.map_err(|e| RouterError::Handler(e.into()))?.into_reply()
    }
}

/// JSON formatter that puts a space after `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serializes a value as `{"a": 1, "b": [1, 2]}`.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut ser)?;
    let text =
        String::from_utf8(out).map_err(<serde_json::Error as serde::ser::Error>::custom)?;
    Ok(text)
}
