//! HTTP/1.1 transport serving an [`App`].
//!
//! Each connection is driven by hyper on tokio. The request body is
//! collected in full, then dispatch runs on the blocking pool since
//! handlers are plain synchronous functions.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::app::App;
use crate::error::{Result, RouterError};
use crate::request::Environ;
use crate::response::{Response, Status};
use crate::service::Service;
use crate::table::RouteSource;

/// Default listen host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Serves an application over TCP.
#[derive(Debug)]
pub struct Server<S = Service> {
    app: Arc<App<S>>,
    host: String,
    port: u16,
}

impl<S> Server<S>
where
    S: RouteSource + Send + Sync + 'static,
{
    /// Creates a server for `app` on the default address.
    pub fn new(app: App<S>) -> Self {
        Self {
            app: Arc::new(app),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Sets the listen address.
    #[must_use]
    pub fn bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Resolves the configured host and port.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidAddress`] when nothing resolves.
    pub async fn addr(&self) -> Result<SocketAddr> {
        let target = format!("{}:{}", self.host, self.port);
        let found = tokio::net::lookup_host(target.as_str())
            .await
            .map_err(|_| RouterError::InvalidAddress(target.clone()))?
            .next();
        found.ok_or(RouterError::InvalidAddress(target))
    }

    /// Prepares the app, binds and serves until accepting fails.
    ///
    /// # Errors
    ///
    /// Configuration errors of the app, address resolution and socket
    /// errors.
    pub async fn run(self) -> Result<()> {
        self.app.prepare()?;
        let addr = self.addr().await?;
        let listener = TcpListener::bind(addr).await?;
        info!("Start server {}", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Serves connections from an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns the first accept error.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            debug!(%peer, "accepted connection");
            let io = TokioIo::new(stream);
            let app = Arc::clone(&self.app);

            tokio::task::spawn(async move {
                let service = service_fn(move |req| handle_request(req, Arc::clone(&app)));

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!(%peer, "error serving connection: {err}");
                }
            });
        }
    }
}

async fn handle_request<S>(
    req: HyperRequest<Incoming>,
    app: Arc<App<S>>,
) -> std::result::Result<HyperResponse<Full<Bytes>>, Infallible>
where
    S: RouteSource + Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();

    let mut environ = Environ::new(parts.method.as_str(), parts.uri.path())
        .query_string(parts.uri.query().unwrap_or_default());
    for (key, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            environ = environ.header(key.as_str(), v);
        }
    }
    environ.content_length = environ.get_header("content-length").map(str::to_string);

    let payload = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!("failed to read request body: {err}");
            return Ok(internal_server_error());
        }
    };

    let dispatched =
        tokio::task::spawn_blocking(move || app.dispatch(&environ, &mut &payload[..])).await;

    let response = match dispatched {
        Ok(Ok(response)) => into_hyper(&response),
        Ok(Err(err)) => {
            error!("dispatch failed: {err}");
            internal_server_error()
        }
        Err(err) => {
            error!("handler panicked: {err}");
            internal_server_error()
        }
    };
    Ok(response)
}

fn into_hyper(res: &Response) -> HyperResponse<Full<Bytes>> {
    let status =
        StatusCode::from_u16(res.status.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HyperResponse::builder().status(status);

    for (name, value) in res.header_pairs() {
        builder = builder.header(name, value);
    }

    builder
        .body(Full::new(Bytes::copy_from_slice(res.body_bytes())))
        .unwrap_or_else(|err| {
            error!("invalid response head: {err}");
            internal_server_error()
        })
}

fn internal_server_error() -> HyperResponse<Full<Bytes>> {
    let mut res = HyperResponse::new(Full::new(Bytes::from(
        Status::INTERNAL_SERVER_ERROR.to_string(),
    )));
    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_addr_resolves_ip() {
        let server = Server::new(App::new()).bind("127.0.0.1", 9000);
        assert_eq!(server.addr().await.unwrap(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_addr_rejects_garbage() {
        let server = Server::new(App::new()).bind("not a host", 9000);
        assert!(matches!(
            server.addr().await,
            Err(RouterError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_run_refuses_empty_app() {
        let server = Server::new(App::new()).bind("127.0.0.1", 0);
        assert!(matches!(server.run().await, Err(RouterError::EmptyRouteTree)));
    }

    #[test]
    fn test_into_hyper_copies_head_and_body() {
        let res = into_hyper(&Response::template(Status::METHOD_NOT_ALLOWED));
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()["content-type"], "text/plain");
        assert_eq!(res.headers()["content-length"], "22");
    }
}
