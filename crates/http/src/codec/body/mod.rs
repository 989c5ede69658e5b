//! Request body decoding.
//!
//! Bodies are delimited by `Content-Length` only; a request without that header has
//! no body. Chunked transfer-encoding is not supported.

mod length_decoder;

pub use length_decoder::LengthDecoder;
