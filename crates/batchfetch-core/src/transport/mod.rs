//! Transport collaborator: probing and opening remote sources.
//!
//! The streaming core only needs the [`Transport`] trait. [`HttpTransport`]
//! implements it over libcurl.

mod http;

pub use http::{HttpBody, HttpOptions, HttpTransport};

use crate::progress::ReadClose;
use std::fmt;
use std::io;

/// An opened source: its body and, when the server announced it, its length.
#[derive(Debug)]
pub struct Response<B> {
    pub body: B,
    pub content_length: Option<u64>,
}

/// Ability to size and open sources of type `Source`.
pub trait Transport {
    type Source: fmt::Debug;
    type Body: ReadClose;

    /// Expected length of `source` in bytes, without fetching the body.
    fn probe_length(&self, source: &Self::Source) -> Result<u64, TransportError>;

    /// Starts fetching `source` and returns its body as a stream.
    fn open(&self, source: &Self::Source) -> Result<Response<Self::Body>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Source = T::Source;
    type Body = T::Body;

    fn probe_length(&self, source: &Self::Source) -> Result<u64, TransportError> {
        (**self).probe_length(source)
    }

    fn open(&self, source: &Self::Source) -> Result<Response<Self::Body>, TransportError> {
        (**self).open(source)
    }
}

/// Failure to probe or open a source.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with something other than 2xx.
    #[error("received HTTP code {code}: {}", status_text(*.code))]
    Status { code: u32 },
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// The transfer thread went away without reporting a result.
    #[error("transfer ended unexpectedly")]
    Disconnected,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl TransportError {
    /// HTTP status code for [`TransportError::Status`].
    pub fn status(&self) -> Option<u32> {
        match self {
            TransportError::Status { code } => Some(*code),
            _ => None,
        }
    }
}

impl From<TransportError> for io::Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Io(e) => e,
            TransportError::Disconnected => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

/// Reason phrase for the common HTTP status codes.
pub fn status_text(code: u32) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        206 => "Partial Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        410 => "Gone",
        416 => "Range Not Satisfiable",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}
