//! The seam between the wire layer and the code that produces responses.

use crate::protocol::{ParseError, Request, Response};

/// Produces the single response of a connection.
///
/// [`HttpConnection`](crate::connection::HttpConnection) calls exactly one of the two
/// methods per connection: [`Handler::call`] when a request was decoded, or
/// [`Handler::on_parse_error`] when the bytes on the wire did not form a valid request.
/// Neither can fail; every outcome, including internal faults, must be expressed as a
/// [`Response`].
#[trait_variant::make(Send)]
pub trait Handler: Sync {
    async fn call(&self, request: Request) -> Response;

    fn on_parse_error(&self, error: ParseError) -> Response;
}
