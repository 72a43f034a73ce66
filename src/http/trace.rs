//! A [`Handler`] that renders every event as one line of text.
//!
//! The format is stable and is what the `httpspan` binary prints:
//!
//! ```text
//! off=8 len=4 span[url]="/url"
//! headers complete method=6 v=1/1 flags=0 content_length=0
//! message complete
//! ```

use std::fmt::Write as _;

use crate::http::error::ParseError;
use crate::http::handler::Handler;
use crate::http::message::MessageHead;
use crate::http::span::{Span, SpanKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Removes and returns the lines recorded so far.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

/// Escapes bytes so the text stays on one line.
pub fn escape(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        match b {
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out
}

impl Handler for Trace {
    fn on_span_end(&mut self, kind: SpanKind, span: Span, data: &[u8]) {
        self.lines.push(format!(
            "off={} len={} span[{}]=\"{}\"",
            span.offset,
            span.len,
            kind,
            escape(data)
        ));
    }

    fn on_headers_complete(&mut self, head: &MessageHead) {
        let start = match (head.method, head.status) {
            (Some(method), _) => format!("method={}", method.code()),
            (None, Some(status)) => format!("status={}", status.as_u16()),
            (None, None) => String::from("method=?"),
        };
        self.lines.push(format!(
            "headers complete {start} v={}/{} flags={:x} content_length={}",
            head.version.major,
            head.version.minor,
            head.flags,
            head.content_length.unwrap_or(0)
        ));
    }

    fn on_chunk_header(&mut self, size: u64) {
        self.lines.push(format!("chunk header len={size}"));
    }

    fn on_chunk_complete(&mut self) {
        self.lines.push(String::from("chunk complete"));
    }

    fn on_message_complete(&mut self) {
        self.lines.push(String::from("message complete"));
    }

    fn on_error(&mut self, error: &ParseError) {
        self.lines.push(format!(
            "off={} error code={} reason=\"{}\"",
            error.offset,
            error.code(),
            error.message
        ));
    }

    fn on_pause(&mut self) {
        self.lines.push(String::from("pause"));
    }
}
