use crate::{HandlerError, PathParams};
use async_trait::async_trait;
use bytes::Bytes;
use lean_http::protocol::Request;
use std::fmt;
use std::future::Future;

/// A route target: turns a request and its captured path parameters into a body.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, request: Request, params: PathParams) -> Result<Bytes, HandlerError>;
}

/// Adapts an async fn `(Request, PathParams) -> Result<B, HandlerError>` into a
/// [`RequestHandler`], where `B` is anything convertible to [`Bytes`] (`String`,
/// `&'static str`, `Vec<u8>`, ...).
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

pub fn handler_fn<F, Fut, B>(f: F) -> FnHandler<F>
where
    F: Fn(Request, PathParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<B, HandlerError>> + Send,
    B: Into<Bytes>,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut, B> RequestHandler for FnHandler<F>
where
    F: Fn(Request, PathParams) -> Fut + Send + Sync,
    Fut: Future<Output = Result<B, HandlerError>> + Send,
    B: Into<Bytes> + Send,
{
    async fn invoke(&self, request: Request, params: PathParams) -> Result<Bytes, HandlerError> {
        (self.f)(request, params).await.map(Into::into)
    }
}
