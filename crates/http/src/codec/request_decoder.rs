//! HTTP request decoder module
//!
//! Decodes one complete [`Request`] from a byte stream using a two-phase state machine:
//!
//! 1. Head parsing through [`HeaderDecoder`] (request line, headers, `Host` check)
//! 2. Body reading through [`LengthDecoder`] until `Content-Length` bytes are buffered
//!
//! # Example
//!
//! ```
//! use lean_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 2\r\n\r\nhi");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.resource(), "/echo");
//! assert_eq!(&request.body()[..], b"hi");
//! ```

use crate::codec::body::LengthDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{ParseError, PayloadItem, Request, RequestHead};
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// A decoder producing fully buffered requests.
///
/// # State Machine
///
/// - `pending` is `None`: currently parsing the head
/// - `pending` is `Some(..)`: head parsed, collecting body bytes
#[derive(Debug)]
pub struct RequestDecoder {
    header_decoder: HeaderDecoder,
    pending: Option<PendingBody>,
}

#[derive(Debug)]
struct PendingBody {
    head: RequestHead,
    payload_decoder: LengthDecoder,
    body: BytesMut,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { header_decoder: HeaderDecoder, pending: None }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: head and body are complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: the head is malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.pending.is_none() {
            match self.header_decoder.decode(src)? {
                Some((head, content_length)) => {
                    let body = BytesMut::with_capacity(usize::try_from(content_length).unwrap_or(0).min(src.len()));
                    self.pending = Some(PendingBody { head, payload_decoder: LengthDecoder::new(content_length), body });
                }
                None => return Ok(None),
            }
        }

        self.decode_body(src, false)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.pending.is_none() {
            return match self.header_decoder.decode(src)? {
                Some((head, content_length)) => {
                    self.pending = Some(PendingBody {
                        head,
                        payload_decoder: LengthDecoder::new(content_length),
                        body: BytesMut::new(),
                    });
                    self.decode_body(src, true)
                }
                // peer went away without sending anything
                None if src.is_empty() => Ok(None),
                None => Err(ParseError::invalid_request_line("connection closed before the request head was complete")),
            };
        }

        self.decode_body(src, true)
    }
}

impl RequestDecoder {
    fn decode_body(&mut self, src: &mut BytesMut, eof: bool) -> Result<Option<Request>, ParseError> {
        let Some(mut pending) = self.pending.take() else {
            return Ok(None);
        };

        loop {
            let item = if eof { pending.payload_decoder.decode_eof(src)? } else { pending.payload_decoder.decode(src)? };

            match item {
                Some(PayloadItem::Chunk(bytes)) => pending.body.extend_from_slice(&bytes),
                Some(PayloadItem::Eof) => {
                    let PendingBody { head, body, .. } = pending;
                    return Ok(Some(head.body(body.freeze())));
                }
                None => {
                    self.pending = Some(pending);
                    return Ok(None);
                }
            }
        }
    }
}
