use std::fmt;

/// Kind of token a span identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Request target of a request line
    Url,
    /// Reason phrase of a status line
    Status,
    /// Header (or trailer) field name
    HeaderField,
    /// Header (or trailer) field value, leading whitespace excluded
    HeaderValue,
    /// Message body bytes, chunk framing excluded
    Body,
    /// Everything after `;` on a chunk size line
    ChunkExtension,
}

impl SpanKind {
    /// Name used in traces, e.g. `span[header_field]`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Url => "url",
            SpanKind::Status => "status",
            SpanKind::HeaderField => "header_field",
            SpanKind::HeaderValue => "header_value",
            SpanKind::Body => "body",
            SpanKind::ChunkExtension => "chunk_extension",
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `(offset, len)` view into the buffer passed to the current
/// [`Parser::consume`](crate::http::parser::Parser::consume) call.
///
/// A span never owns bytes and is only meaningful for the buffer it was
/// reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Offset one past the last byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bytes this span covers in `buf`.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is not the buffer the span was reported against and is
    /// too short.
    pub fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.offset..self.end()]
    }
}
