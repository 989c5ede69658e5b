//! A minimal routing web framework on top of `lean-http`.
//!
//! Handlers are plain async functions taking the [`Request`](lean_http::protocol::Request)
//! and the [`PathParams`] captured by the route template. They return a body on success,
//! or a [`HandlerError`] to redirect, abort with a status code, or fail internally.
//!
//! ```no_run
//! use http::StatusCode;
//! use lean_http::protocol::Request;
//! use lean_web::{HandlerError, PathParams, Router, Server, handler_fn};
//!
//! async fn hello(_request: Request, params: PathParams) -> Result<String, HandlerError> {
//!     Ok(format!("Hello, {}!\n", params.get("who").unwrap_or_default()))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = Router::builder().get("/hello/:who", handler_fn(hello)).mount_static("/static", ".").build()?;
//!
//!     Server::builder()
//!         .router(router)
//!         .error_handler(StatusCode::INTERNAL_SERVER_ERROR, || "Internal error :(")
//!         .bind("localhost", 8080)
//!         .build()?
//!         .start()
//!         .await?;
//!     Ok(())
//! }
//! ```

mod dispatcher;
mod error;
mod error_handler;
mod handler;
mod request;
mod server;
mod static_files;

pub mod router;

pub use error::{HandlerError, ProtocolError, abort, redirect};
pub use error_handler::ErrorHandlers;
pub use handler::{FnHandler, RequestHandler, handler_fn};
pub use request::PathParams;
pub use router::Router;
pub use server::{Server, ServerBuildError, ServerBuilder, ServerConfig, ServerError};
pub use static_files::StaticFiles;
