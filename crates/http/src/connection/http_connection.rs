use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, trace};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{ParseError, Request, Response};

/// Initial capacity of the read buffer, large enough for a typical request head.
const READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// One accepted connection, serving exactly one request.
///
/// `HttpConnection` reads and decodes a single request, asks the [`Handler`] for the
/// response, writes it and shuts the write side down. There is no keep-alive: whatever
/// happens, the connection is finished once [`HttpConnection::process`] returns.
///
/// Failures to write or to shut down are logged and dropped here, so a peer that went
/// away early never surfaces as an error to the handler.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_CAPACITY),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Runs the whole request/response cycle of this connection.
    pub async fn process<H: Handler>(mut self, handler: Arc<H>) {
        let response = match self.read_request().await {
            Some(Ok(request)) => handler.call(request).await,
            Some(Err(e)) => {
                debug!(cause = %e, "can't decode request");
                handler.on_parse_error(e)
            }
            None => {
                debug!("peer closed the connection without sending a request");
                self.close().await;
                return;
            }
        };

        self.send_response(response).await;
    }

    /// Reads the single request of this connection.
    ///
    /// Returns `None` when the peer closed the connection before sending any byte.
    pub async fn read_request(&mut self) -> Option<Result<Request, ParseError>> {
        self.framed_read.next().await
    }

    /// Writes `response` and closes the connection.
    pub async fn send_response(mut self, response: Response) {
        let status = response.status();
        match self.framed_write.send(response).await {
            Ok(()) => trace!(status = status.as_u16(), "response written"),
            Err(e) => debug!(cause = %e, status = status.as_u16(), "failed to write response, peer may be gone"),
        }

        self.close().await;
    }

    async fn close(mut self) {
        if let Err(e) = self.framed_write.close().await {
            debug!(cause = %e, "failed to shutdown connection");
        }
    }
}
