//! Request head decoder: request line plus header fields.
//!
//! The request line is split by hand on runs of ASCII whitespace so that the number of
//! tokens decides the failure status:
//!
//! - 2 tokens: `505 HTTP Version Not Supported` (an HTTP/0.9 style `GET /` line)
//! - anything but 3 tokens: `400 Bad Request`
//! - a version other than `HTTP/1.1`: `505`
//! - a method outside `DELETE GET HEAD POST PUT` (compared upper-cased): `405`
//!
//! Header fields are then parsed with `httparse::parse_headers` up to the blank line.
//! A request without a `Host` header is rejected with `400`.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum head size: 8KB

use bytes::{Buf, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, Query, RequestHead};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the request line plus the header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

const SUPPORTED_VERSION: &str = "HTTP/1.1";

const SUPPORTED_METHODS: [Method; 5] = [Method::DELETE, Method::GET, Method::HEAD, Method::POST, Method::PUT];

/// Decoder for request heads implementing the [`Decoder`] trait.
///
/// Yields the parsed [`RequestHead`] together with the declared body length.
#[derive(Debug)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = (RequestHead, u64);
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(line_end) = src.iter().position(|b| *b == b'\n') else {
            ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
            return Ok(None);
        };

        let (method, resource, query) = parse_request_line(&src[..line_end])?;

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let parsed_result = httparse::parse_headers(&src[line_end + 1..], &mut headers).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        });

        match parsed_result? {
            Status::Complete((header_len, parsed_headers)) => {
                let head_len = line_end + 1 + header_len;
                trace!(head_size = head_len, "parsed request head");
                ensure!(head_len <= MAX_HEADER_BYTES, ParseError::too_large_header(head_len, MAX_HEADER_BYTES));

                let mut header_map = HeaderMap::with_capacity(parsed_headers.len());
                for header in parsed_headers.iter() {
                    let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
                    let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
                    header_map.append(name, value);
                }

                ensure!(header_map.contains_key(http::header::HOST), ParseError::MissingHost);
                let content_length = parse_content_length(&header_map)?;

                src.advance(head_len);
                Ok(Some((RequestHead::new(method, resource, query, header_map), content_length)))
            }
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                Ok(None)
            }
        }
    }
}

/// Splits and validates the request line, returning the method, the path and the
/// decoded query.
fn parse_request_line(line: &[u8]) -> Result<(Method, String, Query), ParseError> {
    let line = std::str::from_utf8(line).map_err(ParseError::invalid_request_line)?;
    let tokens = line.split_ascii_whitespace().collect::<Vec<_>>();

    let [method, target, version] = tokens[..] else {
        return Err(ParseError::request_line_parts(tokens.len(), line.trim()));
    };

    ensure!(version == SUPPORTED_VERSION, ParseError::UnsupportedVersion(version.to_string()));

    let method = method.to_ascii_uppercase();
    let method = SUPPORTED_METHODS
        .into_iter()
        .find(|supported| supported.as_str() == method)
        .ok_or(ParseError::MethodNotAllowed(method))?;

    let uri = target.parse::<Uri>().map_err(|_| ParseError::InvalidUri(target.to_string()))?;
    let query = Query::parse(uri.query().unwrap_or_default())?;

    Ok((method, uri.path().to_string(), query))
}

/// Reads the declared body length. No `Content-Length` means no body.
fn parse_content_length(headers: &HeaderMap) -> Result<u64, ParseError> {
    let Some(cl_value) = headers.get(http::header::CONTENT_LENGTH) else {
        return Ok(0);
    };

    let cl_str = cl_value.to_str().map_err(|_| ParseError::invalid_content_length("value can't to_str"))?;
    cl_str.trim().parse::<u64>().map_err(|_| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use indoc::indoc;

    fn decode(str: &str) -> Result<Option<(RequestHead, u64)>, ParseError> {
        let mut buf = BytesMut::from(str);
        HeaderDecoder.decode(&mut buf)
    }

    fn decode_err(str: &str) -> ParseError {
        decode(str).unwrap_err()
    }

    #[test]
    fn test_bytes_mut_lens() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##};

        let mut bytes = BytesMut::from(str);

        let result = HeaderDecoder.decode(&mut bytes).unwrap();

        assert!(result.is_some());

        assert_eq!(bytes.len(), 3);
        assert_eq!(&bytes[..], &b"123"[..]);
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let (head, content_length) = decode(str).unwrap().unwrap();

        assert_eq!(content_length, 0);
        assert_eq!(head.method(), &Method::GET);
        assert_eq!(head.resource(), "/index.html");
        assert_eq!(head.headers().len(), 3);
        assert_eq!(head.headers().get(http::header::ACCEPT), Some(&HeaderValue::from_static("*/*")));
        assert_eq!(head.headers().get(http::header::HOST), Some(&HeaderValue::from_static("127.0.0.1:8080")));
    }

    #[test]
    fn crlf_and_query() {
        let (head, content_length) =
            decode("post /form?a=1&b=2&a=3 HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello").unwrap().unwrap();

        assert_eq!(head.method(), &Method::POST);
        assert_eq!(head.resource(), "/form");
        assert_eq!(content_length, 5);

        let request = head.body("hello");
        assert_eq!(request.query().get("a"), Some(&["1".to_string(), "3".to_string()][..]));
        assert_eq!(request.query_first("b"), Some("2"));
    }

    #[test]
    fn extra_whitespace_between_tokens() {
        let (head, _) = decode("GET  \t/spaced   HTTP/1.1  \r\nHost: x\r\n\r\n").unwrap().unwrap();
        assert_eq!(head.resource(), "/spaced");
    }

    #[test]
    fn absolute_form_target() {
        let (head, _) = decode("GET http://example.com/a/b?x=1 HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap().unwrap();
        assert_eq!(head.resource(), "/a/b");
    }

    #[test]
    fn request_line_token_counts() {
        assert_eq!(decode_err("GET\r\nHost: x\r\n\r\n").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(decode_err("GET /\r\nHost: x\r\n\r\n").status_code(), StatusCode::HTTP_VERSION_NOT_SUPPORTED);
        assert_eq!(decode_err("GET / HTTP/1.1 x\r\nHost: x\r\n\r\n").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(decode_err("\r\n\r\n").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unsupported_version() {
        let error = decode_err("GET / HTTP/1.0\r\nHost: x\r\n\r\n");
        assert_eq!(error.status_code(), StatusCode::HTTP_VERSION_NOT_SUPPORTED);
        assert_eq!(error.data(), "HTTP/1.0");

        let error = decode_err("GET / http/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(error.status_code(), StatusCode::HTTP_VERSION_NOT_SUPPORTED);
    }

    #[test]
    fn unsupported_method() {
        let error = decode_err("patch / HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(error.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error.data(), "PATCH");
    }

    #[test]
    fn missing_host() {
        let error = decode_err("GET / HTTP/1.1\r\nAccept: */*\r\n\r\n");
        assert!(matches!(error, ParseError::MissingHost));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_content_length() {
        let error = decode_err("POST / HTTP/1.1\r\nHost: x\r\nContent-Length: abc\r\n\r\n");
        assert!(matches!(error, ParseError::InvalidContentLength { .. }));
    }

    #[test]
    fn partial_head_needs_more_bytes() {
        assert!(decode("GET / HTT").unwrap().is_none());
        assert!(decode("GET / HTTP/1.1\r\nHost: x\r\n").unwrap().is_none());
    }

    #[test]
    fn too_large_head() {
        let long = format!("GET /{} HTTP/1.1", "a".repeat(MAX_HEADER_BYTES));
        let error = decode_err(&long);
        assert_eq!(error.status_code(), StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
    }

    #[test]
    fn too_many_headers() {
        let mut str = String::from("GET / HTTP/1.1\r\nHost: x\r\n");
        for i in 0..MAX_HEADER_NUM {
            str.push_str(&format!("X-{i}: v\r\n"));
        }
        str.push_str("\r\n");

        let error = decode_err(&str);
        assert!(matches!(error, ParseError::TooManyHeaders { .. }));
    }
}
