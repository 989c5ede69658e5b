//! The wire layer of a minimal HTTP/1.1 server.
//!
//! This crate turns the bytes of one accepted connection into a [`protocol::Request`],
//! hands it to a [`handler::Handler`] and writes the returned [`protocol::Response`]
//! back before closing the connection. It deliberately supports only what simple
//! GET/POST services need:
//!
//! - HTTP/1.1 only; any other version in the request line is answered with 505
//! - `DELETE`, `GET`, `HEAD`, `POST` and `PUT`; other methods are answered with 405
//! - a mandatory `Host` header
//! - bodies delimited by `Content-Length` (no chunked transfer-encoding)
//! - one request per connection, every response carries `Connection: close`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lean_http::connection::HttpConnection;
//! use lean_http::handler::Handler;
//! use lean_http::protocol::{ParseError, Request, Response};
//! use tokio::net::TcpListener;
//! use tracing::{info, warn};
//!
//! struct HelloWorld;
//!
//! impl Handler for HelloWorld {
//!     async fn call(&self, request: Request) -> Response {
//!         info!(path = request.resource(), "serving request");
//!         Response::ok("Hello World!\r\n")
//!     }
//!
//!     fn on_parse_error(&self, error: ParseError) -> Response {
//!         Response::new(error.status_code()).with_body(error.data())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let tcp_listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let handler = Arc::new(HelloWorld);
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             HttpConnection::new(reader, writer).process(handler).await;
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: one-shot connection lifecycle
//! - [`protocol`]: request, query, response and error types
//! - [`codec`]: `tokio_util` decoder/encoder for the wire format
//! - [`handler`]: the trait the framework layer implements
//!
//! # Limits
//!
//! - Maximum request head size: 8KB
//! - Maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
