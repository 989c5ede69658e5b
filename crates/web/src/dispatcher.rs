//! Turns one decoded request into one response.
//!
//! Every request ends in one of three outcomes:
//!
//! - **success**: the handler returned a body, answered with `200 OK`
//! - **redirect**: the handler returned [`HandlerError::Redirect`], answered with
//!   `301`/`302` and a `Location` header
//! - **error**: the request could not be parsed, no route matched, the handler
//!   aborted, failed or panicked
//!
//! Error responses follow one rule: explicit data on the error is the body; without
//! data, the registered error handler for the code produces the body; without either,
//! the body is empty. Internal faults never leak their details to the client.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;
use futures::FutureExt;
use http::{HeaderValue, Method, StatusCode, header};
use lean_http::handler::Handler;
use lean_http::protocol::{ParseError, Request, Response};
use tracing::{error, info, warn};

use crate::error_handler::ErrorHandlers;
use crate::router::Router;
use crate::{HandlerError, ProtocolError};

#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    error_handlers: ErrorHandlers,
    origin: String,
}

impl Dispatcher {
    /// `origin` (e.g. `http://localhost:8080`) is prepended to redirect targets that
    /// start with `/`.
    pub fn new(router: Router, error_handlers: ErrorHandlers, origin: impl Into<String>) -> Self {
        Self { router, error_handlers, origin: origin.into() }
    }

    async fn dispatch(&self, request: Request) -> Result<Bytes, HandlerError> {
        let Some(route_result) = self.router.at(request.method(), request.resource()) else {
            return Err(ProtocolError::not_found(request.resource()).into());
        };

        let (route, params) = route_result.into_parts();
        AssertUnwindSafe(route.handler().invoke(request, params))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::internal(panic_message(panic.as_ref()))))
    }

    fn redirect_response(&self, method: &Method, resource: &str, location: String, temporary: bool) -> Response {
        let code = if temporary { StatusCode::FOUND } else { StatusCode::MOVED_PERMANENTLY };
        let location = if location.starts_with('/') { format!("{}{}", self.origin, location) } else { location };

        let value = match HeaderValue::from_str(&location) {
            Ok(value) => value,
            Err(e) => {
                error!(cause = %e, %location, "redirect target is not a valid header value");
                return self.error_response(ProtocolError::new(StatusCode::INTERNAL_SERVER_ERROR));
            }
        };

        info!("{} {} {} {} -> {}", code.as_u16(), reason(code), method, resource, location);
        Response::new(code).with_header(header::LOCATION, value)
    }

    fn error_response(&self, error: ProtocolError) -> Response {
        let code = error.code();
        let data = error.data();

        if code.is_server_error() {
            error!("{} {} {}", code.as_u16(), reason(code), data.unwrap_or_default());
        } else {
            warn!("{} {} {}", code.as_u16(), reason(code), data.unwrap_or_default());
        }

        if data.is_none()
            && let Some(body) = self.render_error_body(code)
        {
            return Response::new(code).with_body(body);
        }

        let mut response = Response::new(code);
        if let Ok(content_type) = HeaderValue::from_str(mime::TEXT_PLAIN_UTF_8.as_ref()) {
            response = response.with_header(header::CONTENT_TYPE, content_type);
        }
        response.with_body(data.unwrap_or_default().to_string())
    }

    /// A panicking error handler counts as no handler.
    fn render_error_body(&self, code: StatusCode) -> Option<Bytes> {
        panic::catch_unwind(AssertUnwindSafe(|| self.error_handlers.render(code))).unwrap_or_else(|panic| {
            error!("error handler for {} failed: {}", code.as_u16(), panic_message(panic.as_ref()));
            None
        })
    }
}

impl Handler for Dispatcher {
    async fn call(&self, request: Request) -> Response {
        let method = request.method().clone();
        let resource = request.resource().to_string();
        info!("{} {}", method, resource);

        match self.dispatch(request).await {
            Ok(body) => {
                info!("200 OK {} {}", method, resource);
                Response::ok(body)
            }
            Err(HandlerError::Redirect { location, temporary }) => {
                self.redirect_response(&method, &resource, location, temporary)
            }
            Err(HandlerError::Abort(error)) => self.error_response(error),
            Err(HandlerError::Internal(e)) => {
                error!(cause = %e, "Unexpected error while handling {} {}", method, resource);
                self.error_response(ProtocolError::new(StatusCode::INTERNAL_SERVER_ERROR))
            }
        }
    }

    fn on_parse_error(&self, error: ParseError) -> Response {
        self.error_response(error.into())
    }
}

fn reason(code: StatusCode) -> &'static str {
    code.canonical_reason().unwrap_or("Unknown")
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PathParams, abort, handler_fn, redirect};
    use http::HeaderMap;
    use lean_http::protocol::{Query, RequestHead};

    const ORIGIN: &str = "http://example.test:8080";

    async fn index(_request: Request, _params: PathParams) -> Result<&'static str, HandlerError> {
        Ok("Hello, world!")
    }

    async fn hello(_request: Request, params: PathParams) -> Result<String, HandlerError> {
        Ok(format!("Hello, {}!\n", params.get("who").unwrap_or_default()))
    }

    async fn echo(request: Request, _params: PathParams) -> Result<Bytes, HandlerError> {
        Ok(request.body().clone())
    }

    async fn howdy(_request: Request, params: PathParams) -> Result<String, HandlerError> {
        Err(redirect(format!("/hello/{}", params.get("who").unwrap_or_default()), true))
    }

    async fn moved(_request: Request, _params: PathParams) -> Result<String, HandlerError> {
        Err(redirect("https://elsewhere.test/new", false))
    }

    async fn four_oh_four(_request: Request, _params: PathParams) -> Result<String, HandlerError> {
        Err(abort(StatusCode::NOT_FOUND, "Four oh four"))
    }

    async fn teapot(_request: Request, _params: PathParams) -> Result<String, HandlerError> {
        Err(ProtocolError::new(StatusCode::IM_A_TEAPOT).into())
    }

    async fn fails(_request: Request, _params: PathParams) -> Result<String, HandlerError> {
        let number = "not a number".parse::<u32>().map_err(HandlerError::internal)?;
        Ok(number.to_string())
    }

    async fn panics(_request: Request, _params: PathParams) -> Result<String, HandlerError> {
        panic!("secret database password in panic message")
    }

    fn dispatcher() -> Dispatcher {
        let router = Router::builder()
            .get("/", handler_fn(index))
            .get("/hello/:who", handler_fn(hello))
            .get("/howdy/:who", handler_fn(howdy))
            .get("/moved", handler_fn(moved))
            .get("/404", handler_fn(four_oh_four))
            .get("/teapot", handler_fn(teapot))
            .get("/500", handler_fn(fails))
            .get("/panic", handler_fn(panics))
            .post("/echo", handler_fn(echo))
            .build()
            .unwrap();

        let mut error_handlers = ErrorHandlers::new();
        error_handlers.register(StatusCode::INTERNAL_SERVER_ERROR, || "Internal error :(");
        error_handlers.register(StatusCode::NOT_FOUND, || "custom not found");

        Dispatcher::new(router, error_handlers, ORIGIN)
    }

    fn request(method: Method, path: &str, body: &'static str) -> Request {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.test"));
        RequestHead::new(method, path, Query::default(), headers).body(body)
    }

    async fn get(path: &str) -> Response {
        dispatcher().call(request(Method::GET, path, "")).await
    }

    #[tokio::test]
    async fn success() {
        let response = get("/hello/world").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), "Hello, world!\n");
        assert!(response.headers().is_empty());
    }

    #[tokio::test]
    async fn body_reaches_handler() {
        let response = dispatcher().call(request(Method::POST, "/echo", "ping")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), "ping");
    }

    #[tokio::test]
    async fn no_route_is_404_with_resource_as_data() {
        let response = get("/nowhere").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body(), "/nowhere");
        assert_eq!(response.header(&header::CONTENT_TYPE).unwrap(), mime::TEXT_PLAIN_UTF_8.as_ref());
    }

    #[tokio::test]
    async fn wrong_method_is_404() {
        let response = dispatcher().call(request(Method::POST, "/", "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn temporary_redirect_is_made_absolute() {
        let response = get("/howdy/partner").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.header(&header::LOCATION).unwrap(), "http://example.test:8080/hello/partner");
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn permanent_redirect_keeps_absolute_url() {
        let response = get("/moved").await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.header(&header::LOCATION).unwrap(), "https://elsewhere.test/new");
    }

    #[tokio::test]
    async fn abort_data_wins_over_error_handler() {
        let response = get("/404").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body(), "Four oh four");
    }

    #[tokio::test]
    async fn abort_without_data_and_without_handler() {
        let response = get("/teapot").await;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert!(response.body().is_empty());
        assert!(response.header(&header::CONTENT_TYPE).is_some());
    }

    #[tokio::test]
    async fn internal_error_uses_error_handler() {
        let response = get("/500").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), "Internal error :(");
        assert!(response.header(&header::CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn panic_is_internal_error_without_details() {
        let response = get("/panic").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), "Internal error :(");
    }

    #[tokio::test]
    async fn internal_error_without_handler_has_empty_body() {
        let router = Router::builder().get("/500", handler_fn(fails)).build().unwrap();
        let dispatcher = Dispatcher::new(router, ErrorHandlers::new(), ORIGIN);

        let response = dispatcher.call(request(Method::GET, "/500", "")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn panicking_error_handler_falls_back_to_empty_body() {
        let router = Router::builder().get("/teapot", handler_fn(teapot)).build().unwrap();
        let mut error_handlers = ErrorHandlers::new();
        error_handlers.register(StatusCode::IM_A_TEAPOT, || -> &'static str { panic!("kettle exploded") });
        let dispatcher = Dispatcher::new(router, error_handlers, ORIGIN);

        let response = dispatcher.call(request(Method::GET, "/teapot", "")).await;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert!(response.body().is_empty());
        assert_eq!(response.header(&header::CONTENT_TYPE).unwrap(), mime::TEXT_PLAIN_UTF_8.as_ref());
    }

    #[test]
    fn parse_errors_carry_their_data() {
        let response = dispatcher().on_parse_error(ParseError::UnsupportedVersion("HTTP/1.0".to_string()));

        assert_eq!(response.status(), StatusCode::HTTP_VERSION_NOT_SUPPORTED);
        assert_eq!(response.body(), "HTTP/1.0");
    }

    #[test]
    fn missing_host_is_bad_request() {
        let response = dispatcher().on_parse_error(ParseError::MissingHost);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), "Host header is required.");
    }
}
