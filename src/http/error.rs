//! Parser errors.
//!
//! Every error is terminal for the [`Parser`](crate::http::parser::Parser)
//! that produced it: the parser keeps returning the same error until it is
//! reset.

/// Closed set of failure classes with stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidMethod,
    InvalidUrl,
    /// A fixed literal such as `HTTP/` did not match
    InvalidConstant,
    InvalidVersion,
    InvalidStatus,
    InvalidHeaderToken,
    CrExpected,
    LfExpected,
    InvalidContentLength,
    ContentLengthOverflow,
    DuplicateContentLength,
    ChunkedContentLengthConflict,
    InvalidChunkSize,
    InvalidChunkExtension,
    /// Head or trailer section larger than `max_header_size`
    HeaderOverflow,
    /// More fields than `max_header_count`
    TooManyHeaders,
    /// Bytes after a completed message while restart is disabled
    UnexpectedData,
    /// Bytes after a message that closes the connection
    ClosedConnection,
    UnexpectedEof,
    UnexpectedEofInBody,
}

impl ErrorKind {
    /// Numeric code, stable across releases.
    pub fn code(&self) -> u8 {
        match self {
            ErrorKind::InvalidMethod => 1,
            ErrorKind::InvalidUrl => 2,
            ErrorKind::InvalidConstant => 3,
            ErrorKind::InvalidVersion => 4,
            ErrorKind::InvalidStatus => 5,
            ErrorKind::InvalidHeaderToken => 6,
            ErrorKind::CrExpected => 7,
            ErrorKind::LfExpected => 8,
            ErrorKind::InvalidContentLength => 9,
            ErrorKind::ContentLengthOverflow => 10,
            ErrorKind::DuplicateContentLength => 11,
            ErrorKind::ChunkedContentLengthConflict => 12,
            ErrorKind::InvalidChunkSize => 13,
            ErrorKind::InvalidChunkExtension => 14,
            ErrorKind::HeaderOverflow => 15,
            ErrorKind::TooManyHeaders => 16,
            ErrorKind::UnexpectedData => 17,
            ErrorKind::ClosedConnection => 18,
            ErrorKind::UnexpectedEof => 19,
            ErrorKind::UnexpectedEofInBody => 20,
        }
    }

    /// Default human-readable reason for this kind.
    pub fn reason(&self) -> &'static str {
        match self {
            ErrorKind::InvalidMethod => "Invalid method",
            ErrorKind::InvalidUrl => "Invalid URL",
            ErrorKind::InvalidConstant => "Expected HTTP/",
            ErrorKind::InvalidVersion => "Invalid HTTP version",
            ErrorKind::InvalidStatus => "Invalid status code",
            ErrorKind::InvalidHeaderToken => "Invalid header token",
            ErrorKind::CrExpected => "Expected CR",
            ErrorKind::LfExpected => "Expected LF after CR",
            ErrorKind::InvalidContentLength => "Invalid character in Content-Length",
            ErrorKind::ContentLengthOverflow => "Content-Length overflow",
            ErrorKind::DuplicateContentLength => "Duplicate Content-Length",
            ErrorKind::ChunkedContentLengthConflict => {
                "Content-Length can't be present with chunked encoding"
            }
            ErrorKind::InvalidChunkSize => "Invalid character in chunk size",
            ErrorKind::InvalidChunkExtension => "Invalid character in chunk extension",
            ErrorKind::HeaderOverflow => "Header section too large",
            ErrorKind::TooManyHeaders => "Too many header fields",
            ErrorKind::UnexpectedData => "Data after message complete",
            ErrorKind::ClosedConnection => "Data after `Connection: close`",
            ErrorKind::UnexpectedEof => "Unexpected EOF",
            ErrorKind::UnexpectedEofInBody => "Unexpected EOF in body",
        }
    }
}

/// A terminal parse failure.
///
/// `offset` is relative to the buffer of the failing `consume` call (it is 0
/// for failures raised by `finish`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub offset: usize,
    pub message: &'static str,
}

impl ParseError {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            message: kind.reason(),
        }
    }

    pub fn with_message(kind: ErrorKind, offset: usize, message: &'static str) -> Self {
        Self {
            kind,
            offset,
            message,
        }
    }

    pub fn code(&self) -> u8 {
        self.kind.code()
    }
}
