//! Connection handling.
//!
//! [`HttpConnection`] owns both halves of one accepted socket and drives the
//! read-request / write-response / close cycle. One request per connection, no
//! keep-alive.

mod http_connection;

pub use http_connection::HttpConnection;
