//! Core HTTP protocol types.
//!
//! This module holds the values that flow through one connection:
//!
//! - **Request side** ([`request`], [`query`]): [`RequestHead`] as produced by the head
//!   decoder, the immutable [`Request`] handed to handlers, and its decoded [`Query`].
//! - **Response side** ([`response`]): the fully buffered [`Response`].
//! - **Payload** ([`message`]): [`PayloadItem`], the unit yielded by the body decoder.
//! - **Errors** ([`error`]): [`ParseError`] for malformed input (each one knows the
//!   status code it is answered with), [`SendError`] for write failures.

mod message;
pub use message::PayloadItem;

mod query;
pub use query::Query;

mod request;
pub use request::Request;
pub use request::RequestHead;

mod response;
pub use response::Response;

mod error;
pub use error::ParseError;
pub use error::SendError;
