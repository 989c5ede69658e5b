use std::future::{self, Future};
use std::io;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use lean_http::connection::HttpConnection;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::dispatcher::Dispatcher;
use crate::error_handler::ErrorHandlers;
use crate::router::Router;

/// Runtime parameters of a [`Server`].
///
/// `host` is also the authority used to absolutize redirect targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    pub fn address(&self) -> String {
        authority(&self.host, self.port)
    }
}

/// `host:port`, with an IPv6 literal host wrapped in brackets.
fn authority(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') { format!("[{host}]:{port}") } else { format!("{host}:{port}") }
}

pub struct ServerBuilder {
    router: Option<Router>,
    error_handlers: ErrorHandlers,
    config: Option<ServerConfig>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, error_handlers: ErrorHandlers::new(), config: None }
    }

    pub fn bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config = Some(ServerConfig::new(host, port));
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Registers the body used for `code` responses that carry no data of their own.
    /// A producer that panics is treated as if none were registered.
    pub fn error_handler<F, B>(mut self, code: StatusCode, producer: F) -> Self
    where
        F: Fn() -> B + Send + Sync + 'static,
        B: Into<Bytes> + 'static,
    {
        self.error_handlers.register(code, producer);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let config = self.config.ok_or(ServerBuildError::MissingAddress)?;
        Ok(Server { router, error_handlers: self.error_handlers, config })
    }
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("router", &self.router)
            .field("error_handlers", &self.error_handlers)
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Debug)]
pub struct Server {
    router: Router,
    error_handlers: ErrorHandlers,
    config: ServerConfig,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("address must be set")]
    MissingAddress,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read the listener address: {0}")]
    LocalAddr(#[source] io::Error),
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn start(self) -> Result<(), ServerError> {
        let address = self.config.address();
        let listener =
            TcpListener::bind(address.as_str()).await.map_err(|source| ServerError::Bind { address, source })?;

        self.serve(listener, interrupt()).await
    }

    /// Serves connections accepted on `listener` until `shutdown` completes.
    ///
    /// Each connection is handled by its own task; in-flight connections are not
    /// cancelled on shutdown, the listener is simply closed.
    pub async fn serve<S>(self, listener: TcpListener, shutdown: S) -> Result<(), ServerError>
    where
        S: Future<Output = ()>,
    {
        let port = listener.local_addr().map_err(ServerError::LocalAddr)?.port();
        let bound = authority(&self.config.host, port);
        let origin = format!("http://{bound}");

        info!("Listening on {}...", bound);
        info!("Hit ^C to stop the server");

        let dispatcher = Arc::new(Dispatcher::new(self.router, self.error_handlers, origin));

        tokio::pin!(shutdown);
        loop {
            let (tcp_stream, remote_addr) = tokio::select! {
                biased;
                () = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok(stream_and_addr) => stream_and_addr,
                    Err(e) => {
                        warn!(cause = %e, "failed to accept");
                        continue;
                    }
                },
            };

            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                HttpConnection::new(reader, writer).process(dispatcher).await;
                debug!(%remote_addr, "connection finished");
            });
        }

        info!("Server stopped accepting connections");
        Ok(())
    }
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "can't listen for Ctrl-C, serving until the process is killed");
        future::pending::<()>().await;
    }
}
