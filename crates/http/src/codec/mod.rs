//! HTTP codec module for decoding requests and encoding responses
//!
//! Both sides plug into `tokio_util::codec` so a connection can be framed with
//! `FramedRead` / `FramedWrite`:
//!
//! - [`RequestDecoder`]: decodes one complete request (head via the [`header`]
//!   module, body via the [`body`] module)
//! - [`ResponseEncoder`]: serializes one complete response
//!
//! # Example
//!
//! ```
//! use lean_http::codec::ResponseEncoder;
//! use lean_http::protocol::Response;
//! use tokio_util::codec::Encoder;
//! use bytes::BytesMut;
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut buffer = BytesMut::new();
//! encoder.encode(Response::ok("hi"), &mut buffer).unwrap();
//! assert!(buffer.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

mod body;
mod header;
mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
