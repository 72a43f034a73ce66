use std::fmt;

use crate::http::flags::Flags;
use crate::http::request::Method;
use crate::http::response::StatusCode;

/// Which start-line grammar the parser expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Request,
    Response,
}

/// Grammar acceptance profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strictness {
    Strict,
    Lenient,
}

/// HTTP version from the start-line, one decimal digit per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const HTTP_10: Version = Version { major: 1, minor: 0 };
    pub const HTTP_11: Version = Version { major: 1, minor: 1 };

    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub fn at_least_1_1(&self) -> bool {
        *self >= Self::HTTP_11
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// Snapshot handed to
/// [`Handler::on_headers_complete`](crate::http::handler::Handler::on_headers_complete)
/// once framing is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHead {
    pub kind: MessageKind,
    /// Set for requests
    pub method: Option<Method>,
    /// Set for responses
    pub status: Option<StatusCode>,
    pub version: Version,
    pub flags: Flags,
    pub content_length: Option<u64>,
    /// The message switches protocols once complete
    pub upgrade: bool,
}

impl MessageHead {
    pub fn is_chunked(&self) -> bool {
        self.flags.contains(Flags::CHUNKED)
    }
}
