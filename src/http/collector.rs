//! A [`Handler`] that assembles owned messages.
//!
//! The parser itself never copies; this sink is for callers that want a
//! plain [`Request`] or [`Response`] value and are willing to pay for the
//! allocations.
//!
//! # Example
//!
//! ```
//! use httpspan::http::collector::{Message, MessageCollector};
//! use httpspan::http::message::{MessageKind, Strictness};
//! use httpspan::http::parser::Parser;
//!
//! let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
//! let mut collector = MessageCollector::new();
//! parser
//!     .consume(b"POST /upload HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi", &mut collector)
//!     .unwrap();
//!
//! match collector.take_messages().pop() {
//!     Some(Message::Request(req)) => {
//!         assert_eq!(req.url, "/upload");
//!         assert_eq!(&req.body[..], b"hi");
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use bytes::BytesMut;

use crate::http::error::ParseError;
use crate::http::flags::Flags;
use crate::http::handler::Handler;
use crate::http::message::MessageHead;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::span::{Span, SpanKind};

/// A completed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Request(Request),
    Response(Response),
}

type RawField = (Vec<u8>, Vec<u8>);

/// Collects every message the parser completes.
#[derive(Debug, Default)]
pub struct MessageCollector {
    messages: Vec<Message>,
    head: Option<MessageHead>,
    start_line: Vec<u8>,
    headers: Vec<RawField>,
    trailers: Vec<RawField>,
    in_trailers: bool,
    body: BytesMut,
    error: Option<ParseError>,
}

impl MessageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages completed so far, in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    /// The error reported by the parser, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    fn fields(&mut self) -> &mut Vec<RawField> {
        if self.in_trailers {
            &mut self.trailers
        } else {
            &mut self.headers
        }
    }

    fn clear(&mut self) {
        self.head = None;
        self.start_line.clear();
        self.headers.clear();
        self.trailers.clear();
        self.in_trailers = false;
        self.body.clear();
    }

    fn build(&mut self, head: MessageHead) -> Option<Message> {
        let headers = into_strings(std::mem::take(&mut self.headers));
        let trailers = into_strings(std::mem::take(&mut self.trailers));
        let text = String::from_utf8_lossy(&self.start_line).into_owned();
        let body = self.body.split().freeze();

        if let Some(method) = head.method {
            return Some(Message::Request(Request {
                method,
                url: text,
                version: head.version,
                headers,
                trailers,
                flags: head.flags,
                content_length: head.content_length,
                body,
            }));
        }
        let status = head.status?;
        Some(Message::Response(Response {
            status,
            reason: text,
            version: head.version,
            headers,
            trailers,
            flags: head.flags,
            content_length: head.content_length,
            body,
        }))
    }
}

fn into_strings(fields: Vec<RawField>) -> Vec<(String, String)> {
    fields
        .into_iter()
        .map(|(name, value)| {
            (
                String::from_utf8_lossy(&name).into_owned(),
                String::from_utf8_lossy(&value).into_owned(),
            )
        })
        .collect()
}

impl Handler for MessageCollector {
    fn on_message_begin(&mut self) {
        self.clear();
    }

    fn on_span_start(&mut self, kind: SpanKind, _offset: usize) {
        if kind == SpanKind::HeaderField {
            self.fields().push((Vec::new(), Vec::new()));
        }
    }

    fn on_span_end(&mut self, kind: SpanKind, _span: Span, data: &[u8]) {
        match kind {
            SpanKind::Url | SpanKind::Status => self.start_line.extend_from_slice(data),
            SpanKind::HeaderField => {
                if let Some((name, _)) = self.fields().last_mut() {
                    name.extend_from_slice(data);
                }
            }
            SpanKind::HeaderValue => {
                if let Some((_, value)) = self.fields().last_mut() {
                    value.extend_from_slice(data);
                }
            }
            SpanKind::Body => self.body.extend_from_slice(data),
            SpanKind::ChunkExtension => {}
        }
    }

    fn on_headers_complete(&mut self, head: &MessageHead) {
        self.head = Some(*head);
    }

    fn on_chunk_header(&mut self, size: u64) {
        if size == 0 {
            self.in_trailers = true;
        }
    }

    fn on_message_complete(&mut self) {
        let Some(mut head) = self.head.take() else {
            return;
        };
        // trailer fields may have set TRAILING after the head snapshot
        if !self.trailers.is_empty() {
            head.flags.insert(Flags::TRAILING);
        }
        if let Some(message) = self.build(head) {
            self.messages.push(message);
        }
        self.clear();
    }

    fn on_error(&mut self, error: &ParseError) {
        self.error = Some(error.clone());
    }
}
