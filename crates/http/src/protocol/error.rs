use std::io;

use http::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while turning raw bytes into a [`Request`](crate::protocol::Request).
///
/// Each variant maps to the status code the client receives through
/// [`ParseError::status_code`] and to the body text it is answered with through
/// [`ParseError::data`].
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("request line contains {parts} parts: {line:?}")]
    RequestLineParts { parts: usize, line: String },

    #[error("invalid request line: {reason}")]
    InvalidRequestLine { reason: String },

    #[error("unsupported http version: {0}")]
    UnsupportedVersion(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("invalid request target: {0}")]
    InvalidUri(String),

    #[error("invalid query string: {reason}")]
    InvalidQuery { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("Host header is required.")]
    MissingHost,

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn request_line_parts<S: ToString>(parts: usize, line: S) -> Self {
        Self::RequestLineParts { parts, line: line.to_string() }
    }

    pub fn invalid_request_line<S: ToString>(str: S) -> Self {
        Self::InvalidRequestLine { reason: str.to_string() }
    }

    pub fn invalid_query<S: ToString>(str: S) -> Self {
        Self::InvalidQuery { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    /// The status code a client receives for this failure.
    ///
    /// A two-token request line is read as a request from a client that does not
    /// speak HTTP/1.x at all, hence 505 rather than 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestLineParts { parts: 2, .. } => StatusCode::HTTP_VERSION_NOT_SUPPORTED,
            Self::UnsupportedVersion(_) => StatusCode::HTTP_VERSION_NOT_SUPPORTED,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::TooLargeHeader { .. } | Self::TooManyHeaders { .. } => StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            Self::RequestLineParts { .. }
            | Self::InvalidRequestLine { .. }
            | Self::InvalidUri(_)
            | Self::InvalidQuery { .. }
            | Self::InvalidHeader { .. }
            | Self::MissingHost
            | Self::InvalidContentLength { .. }
            | Self::InvalidBody { .. }
            | Self::Io { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// The body text sent back to the client for this failure.
    pub fn data(&self) -> String {
        match self {
            Self::RequestLineParts { parts: 2, .. } => "Request line contains 2 parts".to_string(),
            Self::RequestLineParts { line, .. } => line.clone(),
            Self::UnsupportedVersion(version) => version.clone(),
            Self::MethodNotAllowed(method) => method.clone(),
            Self::InvalidUri(target) => target.clone(),
            other => other.to_string(),
        }
    }
}

/// Failure to write a response to the connection.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}
