//! The incremental HTTP/1.x parser engine.
//!
//! [`Parser::consume`] walks the buffer byte by byte through an explicit
//! [`State`] and reports tokens to a [`Handler`] as spans into that buffer.
//! Nothing is buffered between calls except a few scratch fields (method
//! name, length accumulators, token matchers), so a message may be split at
//! any byte.
//!
//! ```
//! use httpspan::http::handler::Handler;
//! use httpspan::http::message::{MessageKind, Strictness};
//! use httpspan::http::parser::{Outcome, Parser};
//! use httpspan::http::span::{Span, SpanKind};
//!
//! #[derive(Default)]
//! struct Url(Vec<u8>);
//!
//! impl Handler for Url {
//!     fn on_span_end(&mut self, kind: SpanKind, _span: Span, data: &[u8]) {
//!         if kind == SpanKind::Url {
//!             self.0.extend_from_slice(data);
//!         }
//!     }
//! }
//!
//! let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
//! let mut url = Url::default();
//! assert_eq!(parser.consume(b"GET /in", &mut url), Ok(Outcome::Consumed(7)));
//! assert_eq!(parser.consume(b"dex HTTP/1.1\r\n\r\n", &mut url), Ok(Outcome::Consumed(16)));
//! assert_eq!(url.0, b"/index");
//! ```

use std::mem;

use crate::config::Settings;
use crate::http::chars;
use crate::http::error::{ErrorKind, ParseError};
use crate::http::flags::Flags;
use crate::http::framing::{HeaderName, Matcher, ValueState};
use crate::http::handler::Handler;
use crate::http::message::{MessageHead, MessageKind, Strictness, Version};
use crate::http::request::Method;
use crate::http::response::StatusCode;
use crate::http::span::{Span, SpanKind};
use crate::http::state::{Next, State};

const HTTP_LITERAL: &[u8; 5] = b"HTTP/";

/// Result of a successful [`Parser::consume`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All bytes were consumed
    Consumed(usize),
    /// Parsing stopped after a protocol upgrade; bytes from this offset on
    /// belong to the upgraded protocol
    Paused(usize),
}

/// A token that has started but not yet been reported.
#[derive(Debug, Clone, Copy)]
struct Mark {
    kind: SpanKind,
    start: usize,
    /// Carried over from a previous buffer
    continued: bool,
}

/// Per-connection parser state.
///
/// A parser holds no references and no shared state; it can be moved to
/// another thread between calls.
#[derive(Debug, Clone)]
pub struct Parser {
    kind: MessageKind,
    settings: Settings,
    state: State,

    method: Option<Method>,
    status: u16,
    version: Version,
    flags: Flags,
    content_length: Option<u64>,
    upgrade: bool,
    head_request: bool,

    method_buf: [u8; Method::MAX_LEN],
    method_len: usize,
    name: Matcher,
    value: ValueState,
    /// Bytes left in the fixed body or the current chunk; the chunk size
    /// while its line is being read
    remaining: u64,
    head_bytes: usize,
    header_count: usize,
    in_trailers: bool,
    mark: Option<Mark>,
    pending_span: Option<SpanKind>,

    paused: bool,
    error: Option<ParseError>,
}

impl Parser {
    /// Creates a parser with default limits and the given grammar profile.
    pub fn new(kind: MessageKind, strictness: Strictness) -> Self {
        let settings = match strictness {
            Strictness::Strict => Settings::strict(),
            Strictness::Lenient => Settings::lenient(),
        };
        Self::with_settings(kind, settings)
    }

    pub fn with_settings(kind: MessageKind, settings: Settings) -> Self {
        Self {
            kind,
            settings,
            state: State::Start,
            method: None,
            status: 0,
            version: Version::default(),
            flags: Flags::empty(),
            content_length: None,
            upgrade: false,
            head_request: false,
            method_buf: [0; Method::MAX_LEN],
            method_len: 0,
            name: HeaderName::matcher(),
            value: ValueState::Opaque,
            remaining: 0,
            head_bytes: 0,
            header_count: 0,
            in_trailers: false,
            mark: None,
            pending_span: None,
            paused: false,
            error: None,
        }
    }

    /// Returns the parser to its initial state, keeping kind and settings.
    pub fn reset(&mut self) {
        *self = Self::with_settings(self.kind, self.settings.clone());
    }

    /// Leaves the pause entered after an upgrade.
    ///
    /// The parser then behaves as after any completed message: it rejects
    /// further bytes unless `restart_after_complete` is set.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Tells a response parser that the request being answered was `HEAD`,
    /// so the next response has no body whatever its headers say.
    ///
    /// The hint is consumed when that response completes.
    pub fn set_head_request(&mut self, head: bool) {
        self.head_request = head;
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self.kind {
            MessageKind::Response if self.status != 0 => Some(StatusCode::new(self.status)),
            _ => None,
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn is_upgrade(&self) -> bool {
        self.upgrade
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The terminal error, if one occurred.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Whether the connection may carry another message after this one.
    pub fn should_keep_alive(&self) -> bool {
        if self.needs_eof() {
            return false;
        }
        if self.version.at_least_1_1() {
            !self.flags.contains(Flags::CONNECTION_CLOSE)
        } else {
            self.flags.contains(Flags::CONNECTION_KEEP_ALIVE)
        }
    }

    fn needs_eof(&self) -> bool {
        self.kind == MessageKind::Response
            && !self
                .flags
                .intersects(Flags::CHUNKED | Flags::CONTENT_LENGTH | Flags::SKIP_BODY)
    }

    /// Parses `data`, which continues the stream where the previous call
    /// stopped.
    ///
    /// Span offsets reported to `handler` are relative to `data`. After an
    /// error every later call returns the same error until [`reset`].
    ///
    /// [`reset`]: Parser::reset
    pub fn consume<H: Handler + ?Sized>(
        &mut self,
        data: &[u8],
        handler: &mut H,
    ) -> Result<Outcome, ParseError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.paused {
            return Ok(Outcome::Paused(0));
        }
        match self.execute(data, handler) {
            Ok(outcome) => Ok(outcome),
            Err(err) => Err(self.fail(err, data, handler)),
        }
    }

    /// Signals end of stream.
    ///
    /// Completes a response whose body runs until the connection closes, and
    /// reports an error if the stream ends inside a message.
    pub fn finish<H: Handler + ?Sized>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.paused {
            return Ok(());
        }
        self.pending_span = None;
        match self.state {
            State::Start | State::Done => Ok(()),
            State::BodyUntilEof => {
                self.complete_message(handler);
                Ok(())
            }
            state => {
                let kind = if self.in_trailers || state.in_body() {
                    ErrorKind::UnexpectedEofInBody
                } else {
                    ErrorKind::UnexpectedEof
                };
                Err(self.fail(ParseError::new(kind, 0), &[], handler))
            }
        }
    }

    fn fail<H: Handler + ?Sized>(&mut self, err: ParseError, data: &[u8], h: &mut H) -> ParseError {
        if let Some(mark) = self.mark.take() {
            self.flush(mark, err.offset.min(data.len()), data, h);
        }
        self.pending_span = None;
        tracing::debug!(
            code = err.code(),
            offset = err.offset,
            reason = err.message,
            "parse error"
        );
        h.on_error(&err);
        self.error = Some(err.clone());
        err
    }

    fn execute<H: Handler + ?Sized>(
        &mut self,
        data: &[u8],
        h: &mut H,
    ) -> Result<Outcome, ParseError> {
        if let Some(kind) = self.pending_span.take() {
            self.mark = Some(Mark {
                kind,
                start: 0,
                continued: true,
            });
        }

        let strict = self.settings.strict;
        let lf_ok = self.settings.lf_without_cr();
        let mut pos = 0;

        while pos < data.len() {
            let byte = data[pos];

            if self.state.in_head() {
                self.head_bytes += 1;
                if self.head_bytes > self.settings.max_header_size {
                    return Err(ParseError::new(ErrorKind::HeaderOverflow, pos));
                }
            }

            let mut advance = 1;
            match self.state {
                State::Start => {
                    if byte != b'\r' && byte != b'\n' {
                        h.on_message_begin();
                        match self.kind {
                            MessageKind::Request => self.method_byte(byte, pos)?,
                            MessageKind::Response => self.literal_byte(0, byte, pos)?,
                        }
                    }
                }

                State::Method => {
                    if byte == b' ' {
                        let method = Method::from_bytes(&self.method_buf[..self.method_len])
                            .ok_or_else(|| ParseError::new(ErrorKind::InvalidMethod, pos))?;
                        self.method = Some(method);
                        self.state = State::BeforeUrl;
                    } else {
                        self.method_byte(byte, pos)?;
                    }
                }

                State::BeforeUrl => {
                    if byte == b' ' && !strict {
                        // extra separator
                    } else if self.url_char(byte) {
                        self.open(SpanKind::Url, pos, h);
                        self.state = State::Url;
                    } else {
                        return Err(ParseError::new(ErrorKind::InvalidUrl, pos));
                    }
                }

                State::Url => {
                    if byte == b' ' {
                        self.close(pos, data, h);
                        self.state = State::BeforeVersion;
                    } else if byte == b'\r' || byte == b'\n' {
                        return Err(ParseError::with_message(
                            ErrorKind::InvalidVersion,
                            pos,
                            "Missing HTTP version",
                        ));
                    } else if !self.url_char(byte) {
                        return Err(ParseError::new(ErrorKind::InvalidUrl, pos));
                    }
                }

                State::BeforeVersion => {
                    if !(byte == b' ' && !strict) {
                        self.literal_byte(0, byte, pos)?;
                    }
                }

                State::VersionLiteral(index) => self.literal_byte(index, byte, pos)?,

                State::VersionMajor => {
                    if !byte.is_ascii_digit() || (strict && byte != b'1') {
                        return Err(ParseError::new(ErrorKind::InvalidVersion, pos));
                    }
                    self.version.major = byte - b'0';
                    self.state = State::VersionDot;
                }

                State::VersionDot => {
                    if byte != b'.' {
                        return Err(ParseError::new(ErrorKind::InvalidVersion, pos));
                    }
                    self.state = State::VersionMinor;
                }

                State::VersionMinor => {
                    if !byte.is_ascii_digit() || (strict && byte > b'1') {
                        return Err(ParseError::new(ErrorKind::InvalidVersion, pos));
                    }
                    self.version.minor = byte - b'0';
                    self.state = State::AfterVersion;
                }

                State::AfterVersion => match self.kind {
                    MessageKind::Request if byte == b'\r' => {
                        self.state = State::ExpectLf(Next::HeaderStart);
                    }
                    MessageKind::Request if byte == b'\n' && lf_ok => {
                        self.state = State::HeaderStart;
                    }
                    MessageKind::Response if byte == b' ' => {
                        self.state = State::BeforeStatusCode;
                    }
                    _ => {
                        return Err(ParseError::with_message(
                            ErrorKind::InvalidVersion,
                            pos,
                            "Unexpected character after HTTP version",
                        ));
                    }
                },

                State::BeforeStatusCode => {
                    if byte.is_ascii_digit() {
                        self.status = u16::from(byte - b'0');
                        self.state = State::StatusCode(1);
                    } else if byte != b' ' || strict {
                        return Err(ParseError::new(ErrorKind::InvalidStatus, pos));
                    }
                }

                State::StatusCode(digits) => {
                    if !byte.is_ascii_digit() {
                        return Err(ParseError::new(ErrorKind::InvalidStatus, pos));
                    }
                    self.status = self.status * 10 + u16::from(byte - b'0');
                    self.state = if digits == 2 {
                        State::AfterStatusCode
                    } else {
                        State::StatusCode(digits + 1)
                    };
                }

                State::AfterStatusCode => {
                    if byte == b' ' {
                        self.state = State::BeforeReason;
                    } else if byte == b'\r' && !strict {
                        self.state = State::ExpectLf(Next::HeaderStart);
                    } else if byte == b'\n' && lf_ok {
                        self.state = State::HeaderStart;
                    } else {
                        return Err(ParseError::with_message(
                            ErrorKind::InvalidStatus,
                            pos,
                            "Expected space after status code",
                        ));
                    }
                }

                State::BeforeReason => {
                    if byte == b'\r' {
                        self.state = State::ExpectLf(Next::HeaderStart);
                    } else if byte == b'\n' && lf_ok {
                        self.state = State::HeaderStart;
                    } else if self.text_char(byte) {
                        self.open(SpanKind::Status, pos, h);
                        self.state = State::Reason;
                    } else {
                        return Err(ParseError::with_message(
                            ErrorKind::InvalidStatus,
                            pos,
                            "Invalid character in reason phrase",
                        ));
                    }
                }

                State::Reason => {
                    if byte == b'\r' {
                        self.close(pos, data, h);
                        self.state = State::ExpectLf(Next::HeaderStart);
                    } else if byte == b'\n' && lf_ok {
                        self.close(pos, data, h);
                        self.state = State::HeaderStart;
                    } else if !self.text_char(byte) {
                        return Err(ParseError::with_message(
                            ErrorKind::InvalidStatus,
                            pos,
                            "Invalid character in reason phrase",
                        ));
                    }
                }

                State::HeaderStart => {
                    if byte == b'\r' {
                        self.state = State::ExpectLf(Next::HeadersDone);
                    } else if byte == b'\n' && lf_ok {
                        self.headers_done(pos, h)?;
                    } else if chars::is_ows(byte) {
                        return Err(ParseError::with_message(
                            ErrorKind::InvalidHeaderToken,
                            pos,
                            "Unexpected whitespace at start of header line",
                        ));
                    } else if byte == b':' || !self.name_char(byte) {
                        return Err(ParseError::new(ErrorKind::InvalidHeaderToken, pos));
                    } else {
                        self.header_count += 1;
                        if self.header_count > self.settings.max_header_count {
                            return Err(ParseError::new(ErrorKind::TooManyHeaders, pos));
                        }
                        if self.in_trailers {
                            self.flags.insert(Flags::TRAILING);
                        }
                        self.name = HeaderName::matcher();
                        self.name.feed(byte);
                        self.open(SpanKind::HeaderField, pos, h);
                        self.state = State::HeaderField;
                    }
                }

                State::HeaderField => {
                    if byte == b':' {
                        self.close(pos, data, h);
                        self.field_done();
                        self.state = State::BeforeValue;
                    } else if chars::is_ows(byte) && !strict {
                        self.close(pos, data, h);
                        self.state = State::AfterField;
                    } else if self.name_char(byte) {
                        self.name.feed(byte);
                    } else {
                        return Err(ParseError::new(ErrorKind::InvalidHeaderToken, pos));
                    }
                }

                State::AfterField => {
                    if byte == b':' {
                        self.field_done();
                        self.state = State::BeforeValue;
                    } else if !chars::is_ows(byte) {
                        return Err(ParseError::new(ErrorKind::InvalidHeaderToken, pos));
                    }
                }

                State::BeforeValue => {
                    if byte == b'\r' {
                        self.open(SpanKind::HeaderValue, pos, h);
                        self.close(pos, data, h);
                        self.value_done(pos)?;
                        self.state = State::ExpectLf(Next::HeaderStart);
                    } else if byte == b'\n' && lf_ok {
                        self.open(SpanKind::HeaderValue, pos, h);
                        self.close(pos, data, h);
                        self.value_done(pos)?;
                        self.state = State::HeaderStart;
                    } else if !chars::is_ows(byte) {
                        self.open(SpanKind::HeaderValue, pos, h);
                        self.value_byte(byte, pos)?;
                        self.state = State::HeaderValue;
                    }
                }

                State::HeaderValue => {
                    if byte == b'\r' {
                        self.close(pos, data, h);
                        self.value_done(pos)?;
                        self.state = State::ExpectLf(Next::HeaderStart);
                    } else if byte == b'\n' && lf_ok {
                        self.close(pos, data, h);
                        self.value_done(pos)?;
                        self.state = State::HeaderStart;
                    } else {
                        self.value_byte(byte, pos)?;
                    }
                }

                State::ExpectLf(next) => {
                    if byte != b'\n' {
                        return Err(ParseError::new(ErrorKind::LfExpected, pos));
                    }
                    match next {
                        Next::HeaderStart => self.state = State::HeaderStart,
                        Next::HeadersDone => self.headers_done(pos, h)?,
                        Next::ChunkHeaderDone => self.chunk_header_done(h),
                        Next::ChunkComplete => {
                            h.on_chunk_complete();
                            self.state = State::ChunkSizeStart;
                        }
                    }
                }

                State::Body | State::ChunkData => {
                    if self.mark.is_none() {
                        self.open(SpanKind::Body, pos, h);
                    }
                    let available = data.len() - pos;
                    advance = usize::try_from(self.remaining).map_or(available, |r| r.min(available));
                    self.remaining -= advance as u64;
                    if self.remaining == 0 {
                        self.close(pos + advance, data, h);
                        if self.state == State::Body {
                            self.complete_message(h);
                        } else {
                            self.state = State::ChunkDataEnd;
                        }
                    }
                }

                State::BodyUntilEof => {
                    if self.mark.is_none() {
                        self.open(SpanKind::Body, pos, h);
                    }
                    advance = data.len() - pos;
                }

                State::ChunkSizeStart => {
                    let digit = chars::hex_value(byte)
                        .ok_or_else(|| ParseError::new(ErrorKind::InvalidChunkSize, pos))?;
                    self.remaining = u64::from(digit);
                    self.state = State::ChunkSize;
                }

                State::ChunkSize => {
                    if let Some(digit) = chars::hex_value(byte) {
                        self.remaining = self
                            .remaining
                            .checked_mul(16)
                            .map(|v| v | u64::from(digit))
                            .ok_or_else(|| {
                                ParseError::with_message(
                                    ErrorKind::InvalidChunkSize,
                                    pos,
                                    "Chunk size overflow",
                                )
                            })?;
                    } else if chars::is_ows(byte) && !strict {
                        self.state = State::ChunkSizeWs;
                    } else {
                        self.chunk_size_end(byte, pos, lf_ok, h)?;
                    }
                }

                State::ChunkSizeWs => {
                    if !chars::is_ows(byte) {
                        self.chunk_size_end(byte, pos, lf_ok, h)?;
                    }
                }

                State::ChunkExtensionStart => {
                    if byte == b'\r' || (byte == b'\n' && lf_ok) {
                        self.open(SpanKind::ChunkExtension, pos, h);
                        self.close(pos, data, h);
                        self.chunk_line_end(byte, h);
                    } else if self.text_char(byte) {
                        self.open(SpanKind::ChunkExtension, pos, h);
                        self.state = State::ChunkExtension;
                    } else {
                        return Err(ParseError::new(ErrorKind::InvalidChunkExtension, pos));
                    }
                }

                State::ChunkExtension => {
                    if byte == b'\r' || (byte == b'\n' && lf_ok) {
                        self.close(pos, data, h);
                        self.chunk_line_end(byte, h);
                    } else if !self.text_char(byte) {
                        return Err(ParseError::new(ErrorKind::InvalidChunkExtension, pos));
                    }
                }

                State::ChunkDataEnd => {
                    if byte == b'\r' {
                        self.state = State::ExpectLf(Next::ChunkComplete);
                    } else if byte == b'\n' && lf_ok {
                        h.on_chunk_complete();
                        self.state = State::ChunkSizeStart;
                    } else {
                        return Err(ParseError::with_message(
                            ErrorKind::CrExpected,
                            pos,
                            "Expected CRLF after chunk data",
                        ));
                    }
                }

                State::Done => {
                    if !strict && (byte == b'\r' || byte == b'\n') {
                        // stray line ending after a body
                    } else if !self.settings.restart_after_complete {
                        return Err(ParseError::new(ErrorKind::UnexpectedData, pos));
                    } else if strict && !self.should_keep_alive() {
                        return Err(ParseError::new(ErrorKind::ClosedConnection, pos));
                    } else {
                        self.reset_message();
                        self.state = State::Start;
                        advance = 0;
                    }
                }
            }

            pos += advance;
            if self.paused {
                return Ok(Outcome::Paused(pos));
            }
        }

        if let Some(mark) = self.mark.take() {
            self.flush(mark, data.len(), data, h);
            self.pending_span = Some(mark.kind);
        }
        Ok(Outcome::Consumed(data.len()))
    }

    fn method_byte(&mut self, byte: u8, pos: usize) -> Result<(), ParseError> {
        if self.method_len == Method::MAX_LEN {
            return Err(ParseError::new(ErrorKind::InvalidMethod, pos));
        }
        self.method_buf[self.method_len] = byte;
        if !Method::is_known_prefix(&self.method_buf[..=self.method_len]) {
            return Err(ParseError::new(ErrorKind::InvalidMethod, pos));
        }
        self.method_len += 1;
        self.state = State::Method;
        Ok(())
    }

    fn literal_byte(&mut self, index: u8, byte: u8, pos: usize) -> Result<(), ParseError> {
        let i = usize::from(index);
        if HTTP_LITERAL[i] != byte {
            return Err(ParseError::new(ErrorKind::InvalidConstant, pos));
        }
        self.state = if i + 1 == HTTP_LITERAL.len() {
            State::VersionMajor
        } else {
            State::VersionLiteral(index + 1)
        };
        Ok(())
    }

    fn url_char(&self, byte: u8) -> bool {
        if self.settings.strict {
            chars::is_url_char(byte)
        } else {
            chars::is_lenient_url_char(byte)
        }
    }

    fn name_char(&self, byte: u8) -> bool {
        if self.settings.strict {
            chars::is_token(byte)
        } else {
            chars::is_lenient_name_char(byte)
        }
    }

    /// Header values, reason phrases and chunk extensions.
    fn text_char(&self, byte: u8) -> bool {
        if self.settings.strict {
            chars::is_field_vchar(byte)
        } else {
            byte != 0 && byte != b'\r' && byte != b'\n'
        }
    }

    fn field_done(&mut self) {
        let name = HeaderName::from_matcher(&self.name);
        if name == HeaderName::Upgrade && !self.in_trailers {
            self.flags.insert(Flags::UPGRADE);
        }
        self.value = ValueState::for_header(name, self.flags, self.in_trailers);
    }

    fn value_byte(&mut self, byte: u8, pos: usize) -> Result<(), ParseError> {
        if !self.text_char(byte) {
            return Err(ParseError::with_message(
                ErrorKind::InvalidHeaderToken,
                pos,
                "Invalid header value char",
            ));
        }
        self.value
            .feed(byte, self.settings.max_content_length)
            .map_err(|kind| ParseError::new(kind, pos))
    }

    fn value_done(&mut self, pos: usize) -> Result<(), ParseError> {
        mem::replace(&mut self.value, ValueState::Opaque)
            .finish(&mut self.flags, &mut self.content_length)
            .map_err(|kind| ParseError::new(kind, pos))
    }

    /// Runs at the LF that ends the header (or trailer) section.
    fn headers_done<H: Handler + ?Sized>(&mut self, pos: usize, h: &mut H) -> Result<(), ParseError> {
        if self.in_trailers {
            h.on_chunk_complete();
            self.complete_message(h);
            return Ok(());
        }

        if self.flags.contains(Flags::CHUNKED | Flags::CONTENT_LENGTH) {
            return Err(ParseError::new(
                ErrorKind::ChunkedContentLengthConflict,
                pos + 1,
            ));
        }

        let status = StatusCode::new(self.status);
        let both_upgrade = self
            .flags
            .contains(Flags::CONNECTION_UPGRADE | Flags::UPGRADE);
        let skip_body = match self.kind {
            MessageKind::Request => self.method == Some(Method::CONNECT),
            MessageKind::Response => status.forbids_body() || self.head_request,
        };
        if skip_body {
            self.flags.insert(Flags::SKIP_BODY);
        }
        self.upgrade = match self.kind {
            MessageKind::Request => self.method == Some(Method::CONNECT) || both_upgrade,
            MessageKind::Response => status == StatusCode::SWITCHING_PROTOCOLS && both_upgrade,
        };

        let head = MessageHead {
            kind: self.kind,
            method: self.method,
            status: self.status_code(),
            version: self.version,
            flags: self.flags,
            content_length: self.content_length,
            upgrade: self.upgrade,
        };
        tracing::trace!(
            kind = ?self.kind,
            flags = self.flags.bits(),
            content_length = ?self.content_length,
            upgrade = self.upgrade,
            "headers complete"
        );
        h.on_headers_complete(&head);

        if self.flags.contains(Flags::SKIP_BODY) {
            self.complete_message(h);
        } else if self.flags.contains(Flags::CHUNKED) {
            self.state = State::ChunkSizeStart;
        } else if let Some(length) = self.content_length {
            if length == 0 {
                self.complete_message(h);
            } else {
                self.remaining = length;
                self.state = State::Body;
            }
        } else if self.kind == MessageKind::Request {
            self.complete_message(h);
        } else {
            self.state = State::BodyUntilEof;
        }
        Ok(())
    }

    fn chunk_size_end<H: Handler + ?Sized>(
        &mut self,
        byte: u8,
        pos: usize,
        lf_ok: bool,
        h: &mut H,
    ) -> Result<(), ParseError> {
        if byte == b';' {
            self.state = State::ChunkExtensionStart;
        } else if byte == b'\r' || (byte == b'\n' && lf_ok) {
            self.chunk_line_end(byte, h);
        } else {
            return Err(ParseError::new(ErrorKind::InvalidChunkSize, pos));
        }
        Ok(())
    }

    fn chunk_line_end<H: Handler + ?Sized>(&mut self, byte: u8, h: &mut H) {
        if byte == b'\r' {
            self.state = State::ExpectLf(Next::ChunkHeaderDone);
        } else {
            self.chunk_header_done(h);
        }
    }

    fn chunk_header_done<H: Handler + ?Sized>(&mut self, h: &mut H) {
        h.on_chunk_header(self.remaining);
        if self.remaining == 0 {
            self.in_trailers = true;
            self.head_bytes = 0;
            self.header_count = 0;
            self.state = State::HeaderStart;
        } else {
            self.state = State::ChunkData;
        }
    }

    fn complete_message<H: Handler + ?Sized>(&mut self, h: &mut H) {
        self.state = State::Done;
        // the HEAD hint covers one response only
        self.head_request = false;
        tracing::trace!(kind = ?self.kind, upgrade = self.upgrade, "message complete");
        h.on_message_complete();
        if self.upgrade {
            self.paused = true;
            tracing::debug!(kind = ?self.kind, "paused for protocol upgrade");
            h.on_pause();
        }
    }

    /// Clears per-message fields before the next pipelined message.
    fn reset_message(&mut self) {
        self.method = None;
        self.status = 0;
        self.version = Version::default();
        self.flags = Flags::empty();
        self.content_length = None;
        self.upgrade = false;
        self.method_len = 0;
        self.value = ValueState::Opaque;
        self.remaining = 0;
        self.head_bytes = 0;
        self.header_count = 0;
        self.in_trailers = false;
    }

    fn open<H: Handler + ?Sized>(&mut self, kind: SpanKind, pos: usize, h: &mut H) {
        self.mark = Some(Mark {
            kind,
            start: pos,
            continued: false,
        });
        h.on_span_start(kind, pos);
    }

    fn close<H: Handler + ?Sized>(&mut self, end: usize, data: &[u8], h: &mut H) {
        if let Some(mark) = self.mark.take() {
            self.flush(mark, end, data, h);
        }
    }

    fn flush<H: Handler + ?Sized>(&self, mark: Mark, end: usize, data: &[u8], h: &mut H) {
        let end = end.max(mark.start);
        if end == mark.start && mark.continued {
            return;
        }
        let span = Span::new(mark.start, end - mark.start);
        h.on_span_end(mark.kind, span, &data[mark.start..end]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);

        let outcome = parser.consume(req, &mut ()).unwrap();

        assert_eq!(outcome, Outcome::Consumed(req.len()));
        assert_eq!(parser.method(), Some(Method::GET));
        assert_eq!(parser.version(), Version::HTTP_11);
        assert!(parser.should_keep_alive());
    }

    #[test]
    fn method_prefix_is_checked_per_byte() {
        let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
        let err = parser.consume(b"GEX / HTTP/1.1\r\n", &mut ()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidMethod);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn flush_skips_empty_continuation() {
        let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
        assert!(parser.consume(b"GET /a", &mut ()).is_ok());
        assert_eq!(parser.pending_span, Some(SpanKind::Url));
        assert!(parser.consume(b" HTTP/1.1\r\n\r\n", &mut ()).is_ok());
        assert_eq!(parser.pending_span, None);
        assert_eq!(parser.state, State::Done);
    }

    #[test]
    fn reset_clears_sticky_error() {
        let mut parser = Parser::new(MessageKind::Request, Strictness::Strict);
        assert!(parser.consume(b"FOO", &mut ()).is_err());
        assert!(parser.error().is_some());
        parser.reset();
        assert!(parser.error().is_none());
        assert!(parser.consume(b"GET / HTTP/1.0\r\n\r\n", &mut ()).is_ok());
        assert!(!parser.should_keep_alive());
    }
}
