//! HTTP request model.
//!
//! A request is decoded in two steps: the head decoder produces a [`RequestHead`]
//! (method, path, query and headers), then the body decoder reads exactly
//! `Content-Length` bytes and [`RequestHead::body`] turns the pair into an
//! immutable [`Request`].

use bytes::Bytes;
use http::{HeaderMap, HeaderName, Method};

use crate::protocol::Query;

/// Represents a parsed request head, before its body has been read.
#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    resource: String,
    query: Query,
    headers: HeaderMap,
}

impl RequestHead {
    pub fn new(method: Method, resource: impl Into<String>, query: Query, headers: HeaderMap) -> Self {
        Self { method, resource: resource.into(), query, headers }
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path of the request target, without its query string.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns a reference to the request's headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Attaches a body to this head, converting it into a full [`Request`].
    pub fn body(self, body: impl Into<Bytes>) -> Request {
        let Self { method, resource, query, headers } = self;
        Request { method, resource, headers, body: body.into(), query }
    }
}

/// One fully read request.
///
/// Header lookups are case-insensitive. When a header name was sent more than once,
/// [`Request::header`] and `headers().get(..)` return the first occurrence while
/// `headers().get_all(..)` still exposes every value.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    resource: String,
    headers: HeaderMap,
    body: Bytes,
    query: Query,
}

impl Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path. Never contains the query string.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of the header `name`, if it is present and valid visible ASCII.
    pub fn header<K>(&self, name: K) -> Option<&str>
    where
        K: TryInto<HeaderName>,
    {
        let name = name.try_into().ok()?;
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The raw body, exactly `Content-Length` bytes long.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// First value of the query parameter `name`.
    pub fn query_first(&self, name: &str) -> Option<&str> {
        self.query.first(name)
    }
}
