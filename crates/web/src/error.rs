//! Control-flow signals raised by request handlers.
//!
//! A handler returns `Result<B, HandlerError>`. The `Err` side is not only for
//! failures: [`HandlerError::Redirect`] ends the request with a 3xx response and
//! [`HandlerError::Abort`] with an arbitrary status code. Anything else a handler
//! propagates with `?` becomes [`HandlerError::Internal`] and is answered with a 500
//! whose details only reach the logs.

use std::error::Error as StdError;
use std::io;

use http::StatusCode;
use lean_http::protocol::ParseError;
use thiserror::Error;

/// A failure carrying an HTTP status code and optional body data.
///
/// When `data` is present it is sent verbatim as the response body. When it is absent
/// the registered error handler for `code` (if any) produces the body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} {}", .data.as_deref().unwrap_or_default())]
pub struct ProtocolError {
    code: StatusCode,
    data: Option<String>,
}

impl ProtocolError {
    pub fn new(code: StatusCode) -> Self {
        Self { code, data: None }
    }

    pub fn with_data(code: StatusCode, data: impl Into<String>) -> Self {
        Self { code, data: Some(data.into()) }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_data(StatusCode::NOT_FOUND, resource)
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// The explicit body data. An empty string counts as no data.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref().filter(|data| !data.is_empty())
    }
}

impl From<ParseError> for ProtocolError {
    fn from(error: ParseError) -> Self {
        Self::with_data(error.status_code(), error.data())
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Ends the request with `302 Found` when `temporary`, `301 Moved Permanently`
    /// otherwise. A `location` starting with `/` is made absolute with the server's
    /// host and port.
    #[error("redirect to {location}")]
    Redirect { location: String, temporary: bool },

    #[error(transparent)]
    Abort(#[from] ProtocolError),

    #[error("internal error: {0}")]
    Internal(Box<dyn StdError + Send + Sync>),
}

impl HandlerError {
    pub fn internal<E: Into<Box<dyn StdError + Send + Sync>>>(e: E) -> Self {
        Self::Internal(e.into())
    }
}

impl From<io::Error> for HandlerError {
    fn from(e: io::Error) -> Self {
        Self::internal(e)
    }
}

/// Builds the redirect signal for `location`.
///
/// ```
/// use lean_web::{redirect, HandlerError, PathParams};
/// use lean_http::protocol::Request;
///
/// async fn howdy(_request: Request, params: PathParams) -> Result<String, HandlerError> {
///     let who = params.get("who").unwrap_or("stranger");
///     Err(redirect(format!("/hello/{who}"), true))
/// }
/// ```
pub fn redirect(location: impl Into<String>, temporary: bool) -> HandlerError {
    HandlerError::Redirect { location: location.into(), temporary }
}

/// Builds an abort signal with status `code` and body `data`.
pub fn abort(code: StatusCode, data: impl Into<String>) -> HandlerError {
    HandlerError::Abort(ProtocolError::with_data(code, data))
}
