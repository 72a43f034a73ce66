use bytes::Bytes;

use crate::http::flags::Flags;
use crate::http::message::Version;

/// A numeric HTTP status code as read from a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const CONTINUE: StatusCode = StatusCode(100);
    pub const SWITCHING_PROTOCOLS: StatusCode = StatusCode(101);
    pub const OK: StatusCode = StatusCode(200);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const NOT_MODIFIED: StatusCode = StatusCode(304);

    pub fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpspan::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.0)
    }

    /// 1xx, 204 and 304 responses never carry a body, whatever their headers say.
    pub fn forbids_body(&self) -> bool {
        self.is_informational() || self.0 == 204 || self.0 == 304
    }

    /// Returns the standard reason phrase, if the code is a common one.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpspan::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.canonical_reason(), Some("OK"));
    /// assert_eq!(StatusCode::new(299).canonical_reason(), None);
    /// ```
    pub fn canonical_reason(&self) -> Option<&'static str> {
        Some(match self.0 {
            100 => "Continue",
            101 => "Switching Protocols",
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            304 => "Not Modified",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => return None,
        })
    }
}

/// An owned HTTP response assembled by
/// [`MessageCollector`](crate::http::collector::MessageCollector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// Reason phrase as sent, possibly empty
    pub reason: String,
    pub version: Version,
    /// Header fields in arrival order
    pub headers: Vec<(String, String)>,
    /// Trailer fields of a chunked body
    pub trailers: Vec<(String, String)>,
    pub flags: Flags,
    pub content_length: Option<u64>,
    pub body: Bytes,
}

impl Response {
    /// Retrieves the first header value with the given name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodyless_statuses() {
        assert!(StatusCode::CONTINUE.forbids_body());
        assert!(StatusCode::SWITCHING_PROTOCOLS.forbids_body());
        assert!(StatusCode::NO_CONTENT.forbids_body());
        assert!(StatusCode::NOT_MODIFIED.forbids_body());
        assert!(!StatusCode::OK.forbids_body());
        assert!(!StatusCode::new(404).forbids_body());
    }
}
