//! The event sink a [`Parser`](crate::http::parser::Parser) reports to.

use crate::http::error::ParseError;
use crate::http::message::MessageHead;
use crate::http::span::{Span, SpanKind};

/// Receives parser events synchronously from inside `consume`.
///
/// Every method has an empty default body, so sinks only implement what they
/// need.
///
/// Span reporting: `on_span_start` fires once when a token begins.
/// `on_span_end` fires when the token ends, and also whenever the current
/// buffer runs out in the middle of the token; in that case the following
/// `consume` call continues the token from offset 0 and reports the remaining
/// fragments through further `on_span_end` calls. Concatenating the fragments
/// reported after one `on_span_start` yields the whole token.
#[allow(unused_variables)]
pub trait Handler {
    fn on_message_begin(&mut self) {}

    fn on_span_start(&mut self, kind: SpanKind, offset: usize) {}

    /// `data` is `span.slice(buffer)` for the buffer being consumed.
    fn on_span_end(&mut self, kind: SpanKind, span: Span, data: &[u8]) {}

    fn on_headers_complete(&mut self, head: &MessageHead) {}

    fn on_chunk_header(&mut self, size: u64) {}

    fn on_chunk_complete(&mut self) {}

    fn on_message_complete(&mut self) {}

    fn on_error(&mut self, error: &ParseError) {}

    fn on_pause(&mut self) {}
}

/// Ignores every event.
impl Handler for () {}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_message_begin(&mut self) {
        (**self).on_message_begin()
    }

    fn on_span_start(&mut self, kind: SpanKind, offset: usize) {
        (**self).on_span_start(kind, offset)
    }

    fn on_span_end(&mut self, kind: SpanKind, span: Span, data: &[u8]) {
        (**self).on_span_end(kind, span, data)
    }

    fn on_headers_complete(&mut self, head: &MessageHead) {
        (**self).on_headers_complete(head)
    }

    fn on_chunk_header(&mut self, size: u64) {
        (**self).on_chunk_header(size)
    }

    fn on_chunk_complete(&mut self) {
        (**self).on_chunk_complete()
    }

    fn on_message_complete(&mut self) {
        (**self).on_message_complete()
    }

    fn on_error(&mut self, error: &ParseError) {
        (**self).on_error(error)
    }

    fn on_pause(&mut self) {
        (**self).on_pause()
    }
}
