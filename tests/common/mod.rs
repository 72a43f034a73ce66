#![allow(dead_code)]

use httpspan::http::trace::Trace;
use httpspan::{
    ErrorKind, Handler, MessageHead, MessageKind, Outcome, ParseError, Parser, Settings, Span,
    SpanKind,
};

/// Parser events with split span fragments joined back together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin,
    Span(SpanKind, Vec<u8>),
    Headers(MessageHead),
    ChunkHeader(u64),
    ChunkComplete,
    Complete,
    Error(ErrorKind),
    Pause,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Handler for Recorder {
    fn on_message_begin(&mut self) {
        self.events.push(Event::Begin);
    }

    fn on_span_start(&mut self, kind: SpanKind, _offset: usize) {
        self.events.push(Event::Span(kind, Vec::new()));
    }

    fn on_span_end(&mut self, kind: SpanKind, span: Span, data: &[u8]) {
        assert_eq!(span.len, data.len());
        match self.events.last_mut() {
            Some(Event::Span(open, bytes)) if *open == kind => bytes.extend_from_slice(data),
            other => panic!("{kind} fragment without an open span, last event {other:?}"),
        }
    }

    fn on_headers_complete(&mut self, head: &MessageHead) {
        self.events.push(Event::Headers(*head));
    }

    fn on_chunk_header(&mut self, size: u64) {
        self.events.push(Event::ChunkHeader(size));
    }

    fn on_chunk_complete(&mut self) {
        self.events.push(Event::ChunkComplete);
    }

    fn on_message_complete(&mut self) {
        self.events.push(Event::Complete);
    }

    fn on_error(&mut self, error: &ParseError) {
        self.events.push(Event::Error(error.kind));
    }

    fn on_pause(&mut self) {
        self.events.push(Event::Pause);
    }
}

/// Feeds `parts` in order, stopping at the first pause or error.
pub fn record(
    kind: MessageKind,
    settings: &Settings,
    parts: &[&[u8]],
) -> (Vec<Event>, Result<Outcome, ParseError>) {
    let mut parser = Parser::with_settings(kind, settings.clone());
    let mut recorder = Recorder::default();
    let mut last = Ok(Outcome::Consumed(0));
    for part in parts {
        last = parser.consume(part, &mut recorder);
        if !matches!(last, Ok(Outcome::Consumed(_))) {
            break;
        }
    }
    (recorder.events, last)
}

/// Trace lines for `data` fed in one call.
pub fn trace(kind: MessageKind, settings: &Settings, data: &[u8]) -> Vec<String> {
    let mut parser = Parser::with_settings(kind, settings.clone());
    let mut trace = Trace::new();
    let _ = parser.consume(data, &mut trace);
    trace.drain()
}

pub fn request_trace(data: &[u8]) -> Vec<String> {
    trace(MessageKind::Request, &Settings::strict(), data)
}

pub fn response_trace(data: &[u8]) -> Vec<String> {
    trace(MessageKind::Response, &Settings::strict(), data)
}

/// Checks that every two-way split of `data` yields the events of the
/// unsplit run.
pub fn assert_split_invariant(kind: MessageKind, settings: &Settings, data: &[u8]) {
    let (whole, _) = record(kind, settings, &[data]);
    for i in 0..=data.len() {
        let (split, _) = record(kind, settings, &[&data[..i], &data[i..]]);
        assert_eq!(split, whole, "split at {i}");
    }
}

pub fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|s| s.to_string()).collect()
}
