//! Serves a [`Router`] over HTTP/1.1.
//!
//! Every accepted connection is served by hyper on its own tokio task. For each
//! request the body is collected, the router's chain is spawned onto another
//! task, and the response is written as soon as some middleware ends it.
//! A chain that finishes without ending the response leaves the request open
//! until the client gives up; a chain that panics takes its connection down.

use crate::request::Request;
use crate::response::{Response, ResponseBody};
use crate::router::Router;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::error::Error;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Default upper bound for a collected request body, in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug)]
pub struct ServerBuilder {
    router: Option<Router>,
    address: Option<std::io::Result<Vec<SocketAddr>>>,
    body_limit: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, address: None, body_limit: DEFAULT_BODY_LIMIT }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Requests with a larger body are rejected and their connection closed.
    pub fn body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?.map_err(ServerBuildError::InvalidAddress)?;
        if address.is_empty() {
            return Err(ServerBuildError::MissingAddress);
        }
        Ok(Server { router: Arc::new(router), address, body_limit: self.body_limit })
    }
}

#[derive(Debug)]
pub struct Server {
    router: Arc<Router>,
    address: Vec<SocketAddr>,
    body_limit: usize,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("address must be set")]
    MissingAddress,
    #[error("address can not be resolved: {0}")]
    InvalidAddress(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {address:?}: {source}")]
    Bind { address: Vec<SocketAddr>, source: std::io::Error },
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Binds the configured address and serves connections until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(ServerError::Bind { address: self.address, source: e });
            }
        };

        self.serve(tcp_listener).await;
        Ok(())
    }

    /// Serves connections accepted from an already bound listener.
    pub async fn serve(self, tcp_listener: TcpListener) {
        let router = self.router;
        let body_limit = self.body_limit;

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };
            debug!(%remote_addr, "accepted connection");

            let router = Arc::clone(&router);

            tokio::spawn(async move {
                let service = service_fn(move |request| handle(Arc::clone(&router), body_limit, request));
                match http1::Builder::new().serve_connection(TokioIo::new(tcp_stream), service).await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, "service has error, cause {}, connection shutdown", e);
                    }
                }
            });
        }
    }
}

async fn handle(
    router: Arc<Router>,
    body_limit: usize,
    request: http::Request<Incoming>,
) -> Result<http::Response<ResponseBody>, Box<dyn Error + Send + Sync>> {
    let (parts, body) = request.into_parts();
    let body = Limited::new(body, body_limit).collect().await?.to_bytes();

    let mut req = Request::new(parts, body);
    let (mut res, pending) = Response::channel();

    let chain = tokio::spawn(async move {
        router.dispatch(&mut req, &mut res).await;
    });

    if let Some(response) = pending.await {
        return Ok(response);
    }

    // the response was dropped without being ended
    if let Err(e) = chain.await {
        if e.is_panic() {
            std::panic::resume_unwind(e.into_panic());
        }
    }
    std::future::pending().await
}
