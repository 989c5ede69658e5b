//! HTTP head processing.
//!
//! - [`HeaderDecoder`]: parses the request line and the header fields of a request
//! - [`HeaderEncoder`]: writes the status line and header fields of a response

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
