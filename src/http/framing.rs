//! Incremental interpretation of the headers that decide message framing.
//!
//! Everything here is fed one byte at a time, so a header name or value may
//! be split across any number of `consume` calls without buffering it.

use crate::http::chars::is_ows;
use crate::http::error::ErrorKind;
use crate::http::flags::Flags;

const HEADER_NAMES: &[&[u8]] = &[
    b"content-length",
    b"transfer-encoding",
    b"connection",
    b"upgrade",
    b"proxy-connection",
];

const CONNECTION_TOKENS: &[&[u8]] = &[b"keep-alive", b"close", b"upgrade"];

const TRANSFER_CODINGS: &[&[u8]] = &[b"chunked"];

/// Case-insensitive streaming match against a small table of lowercase words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Matcher {
    table: &'static [&'static [u8]],
    candidates: u8,
    index: u8,
}

impl Matcher {
    pub(crate) fn new(table: &'static [&'static [u8]]) -> Self {
        debug_assert!(table.len() <= 8);
        let candidates = if table.len() >= 8 {
            u8::MAX
        } else {
            (1u8 << table.len()) - 1
        };
        Self {
            table,
            candidates,
            index: 0,
        }
    }

    pub(crate) fn feed(&mut self, byte: u8) {
        if self.candidates == 0 {
            return;
        }
        let b = byte.to_ascii_lowercase();
        let i = usize::from(self.index);
        for (n, word) in self.table.iter().enumerate() {
            if self.candidates & (1 << n) != 0 && word.get(i) != Some(&b) {
                self.candidates &= !(1 << n);
            }
        }
        self.index = self.index.saturating_add(1);
    }

    /// Index of the table word matched exactly by the bytes fed so far.
    pub(crate) fn matched(&self) -> Option<usize> {
        (0..self.table.len())
            .find(|&n| self.candidates & (1 << n) != 0 && self.table[n].len() == usize::from(self.index))
    }
}

/// Header names the framing logic cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderName {
    ContentLength,
    TransferEncoding,
    /// `Connection` or `Proxy-Connection`
    Connection,
    Upgrade,
    Other,
}

impl HeaderName {
    pub(crate) fn matcher() -> Matcher {
        Matcher::new(HEADER_NAMES)
    }

    pub(crate) fn from_matcher(m: &Matcher) -> Self {
        match m.matched() {
            Some(0) => HeaderName::ContentLength,
            Some(1) => HeaderName::TransferEncoding,
            Some(2) | Some(4) => HeaderName::Connection,
            Some(3) => HeaderName::Upgrade,
            _ => HeaderName::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Leading,
    Token,
    Trailing,
    /// Whitespace inside an element, e.g. `keep alive`
    Invalid,
}

/// Streaming match of a comma-separated list against a word table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenList {
    matcher: Matcher,
    phase: Phase,
    /// Bit `n` set when table word `n` appeared as an element
    found: u8,
    /// Outcome of the last non-empty element
    last: Option<Option<usize>>,
}

impl TokenList {
    pub(crate) fn new(table: &'static [&'static [u8]]) -> Self {
        Self {
            matcher: Matcher::new(table),
            phase: Phase::Leading,
            found: 0,
            last: None,
        }
    }

    pub(crate) fn feed(&mut self, byte: u8) {
        if byte == b',' {
            self.end_element();
            return;
        }
        if is_ows(byte) {
            if self.phase == Phase::Token {
                self.phase = Phase::Trailing;
            }
            return;
        }
        match self.phase {
            Phase::Leading => {
                self.phase = Phase::Token;
                self.matcher.feed(byte);
            }
            Phase::Token => self.matcher.feed(byte),
            Phase::Trailing => self.phase = Phase::Invalid,
            Phase::Invalid => {}
        }
    }

    fn end_element(&mut self) {
        if self.phase != Phase::Leading {
            let m = if self.phase == Phase::Invalid {
                None
            } else {
                self.matcher.matched()
            };
            if let Some(n) = m {
                self.found |= 1 << n;
            }
            self.last = Some(m);
        }
        self.phase = Phase::Leading;
        self.matcher = Matcher::new(self.matcher.table);
    }

    /// Closes the list, returning the found-set and the last element's match.
    pub(crate) fn finish(mut self) -> (u8, Option<Option<usize>>) {
        self.end_element();
        (self.found, self.last)
    }
}

/// Decimal `Content-Length` accumulator with an overflow ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct LengthDigits {
    value: u64,
    seen_digit: bool,
    trailing_ws: bool,
}

impl LengthDigits {
    pub(crate) fn feed(&mut self, byte: u8, max: u64) -> Result<(), ErrorKind> {
        match byte {
            b'0'..=b'9' if !self.trailing_ws => {
                self.value = self
                    .value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(byte - b'0')))
                    .filter(|v| *v <= max)
                    .ok_or(ErrorKind::ContentLengthOverflow)?;
                self.seen_digit = true;
                Ok(())
            }
            b if is_ows(b) && self.seen_digit => {
                self.trailing_ws = true;
                Ok(())
            }
            _ => Err(ErrorKind::InvalidContentLength),
        }
    }

    pub(crate) fn finish(&self) -> Result<u64, ErrorKind> {
        if self.seen_digit {
            Ok(self.value)
        } else {
            Err(ErrorKind::InvalidContentLength)
        }
    }
}

/// What the parser does with the bytes of the current header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueState {
    Opaque,
    ContentLength(LengthDigits),
    /// A second `Content-Length`; rejected once its value ends
    DuplicateContentLength,
    TransferEncoding(TokenList),
    Connection(TokenList),
}

impl ValueState {
    /// Picks the interpretation for a header that just finished its name.
    /// Trailer fields never influence framing.
    pub(crate) fn for_header(name: HeaderName, flags: Flags, in_trailers: bool) -> Self {
        if in_trailers {
            return ValueState::Opaque;
        }
        match name {
            HeaderName::ContentLength if flags.contains(Flags::CONTENT_LENGTH) => {
                ValueState::DuplicateContentLength
            }
            HeaderName::ContentLength => ValueState::ContentLength(LengthDigits::default()),
            HeaderName::TransferEncoding => {
                ValueState::TransferEncoding(TokenList::new(TRANSFER_CODINGS))
            }
            HeaderName::Connection => ValueState::Connection(TokenList::new(CONNECTION_TOKENS)),
            HeaderName::Upgrade | HeaderName::Other => ValueState::Opaque,
        }
    }

    pub(crate) fn feed(&mut self, byte: u8, max_content_length: u64) -> Result<(), ErrorKind> {
        match self {
            ValueState::ContentLength(digits) => digits.feed(byte, max_content_length),
            ValueState::TransferEncoding(list) | ValueState::Connection(list) => {
                list.feed(byte);
                Ok(())
            }
            ValueState::Opaque | ValueState::DuplicateContentLength => Ok(()),
        }
    }

    /// Applies the finished value to the message flags.
    pub(crate) fn finish(
        self,
        flags: &mut Flags,
        content_length: &mut Option<u64>,
    ) -> Result<(), ErrorKind> {
        match self {
            ValueState::Opaque => {}
            ValueState::ContentLength(digits) => {
                *content_length = Some(digits.finish()?);
                flags.insert(Flags::CONTENT_LENGTH);
            }
            ValueState::DuplicateContentLength => return Err(ErrorKind::DuplicateContentLength),
            ValueState::TransferEncoding(list) => match list.finish().1 {
                // only a final `chunked` frames the body
                Some(Some(0)) => flags.insert(Flags::CHUNKED),
                Some(_) => flags.remove(Flags::CHUNKED),
                None => {}
            },
            ValueState::Connection(list) => {
                let (found, _) = list.finish();
                if found & 0b001 != 0 {
                    flags.insert(Flags::CONNECTION_KEEP_ALIVE);
                }
                if found & 0b010 != 0 {
                    flags.insert(Flags::CONNECTION_CLOSE);
                }
                if found & 0b100 != 0 {
                    flags.insert(Flags::CONNECTION_UPGRADE);
                }
            }
        }
        Ok(())
    }
}
