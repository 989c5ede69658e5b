//! A tiny demo application.
//!
//! ```text
//! curl -i http://localhost:8080/hello/world
//! curl -i http://localhost:8080/howdy/partner
//! curl -i http://localhost:8080/static/Cargo.toml
//! ```

use http::StatusCode;
use lean_http::protocol::Request;
use lean_web::{HandlerError, PathParams, Router, Server, abort, handler_fn, redirect};
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

async fn index(_request: Request, _params: PathParams) -> Result<&'static str, HandlerError> {
    Ok("Hello, world!\n")
}

async fn hello(request: Request, params: PathParams) -> Result<String, HandlerError> {
    let who = params.get("who").unwrap_or_default();
    let greeting = request.query_first("greeting").unwrap_or("Hello");
    Ok(format!("{greeting}, {who}!\n"))
}

async fn howdy(_request: Request, params: PathParams) -> Result<String, HandlerError> {
    Err(redirect(format!("/hello/{}", params.get("who").unwrap_or_default()), true))
}

async fn echo(request: Request, _params: PathParams) -> Result<bytes::Bytes, HandlerError> {
    Ok(request.body().clone())
}

async fn four_oh_four(_request: Request, _params: PathParams) -> Result<String, HandlerError> {
    Err(abort(StatusCode::NOT_FOUND, "Four oh four"))
}

async fn five_hundred(_request: Request, _params: PathParams) -> Result<String, HandlerError> {
    Err(HandlerError::internal("something went sideways"))
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .get("/", handler_fn(index))
        .get("/hello/:who", handler_fn(hello))
        .get("/howdy/:who", handler_fn(howdy))
        .post("/echo", handler_fn(echo))
        .get("/404", handler_fn(four_oh_four))
        .get("/500", handler_fn(five_hundred))
        .mount_static("/static", ".")
        .build()
        .expect("routes must compile");

    let server = Server::builder()
        .router(router)
        .error_handler(StatusCode::INTERNAL_SERVER_ERROR, || "Internal error :(")
        .bind("localhost", 8080)
        .build()
        .expect("server must be configured");

    if let Err(e) = server.start().await {
        error!(cause = %e, "server failed");
    }
}
