use bytes::Bytes;

use crate::http::flags::Flags;
use crate::http::message::Version;

/// HTTP request methods the parser recognizes.
///
/// The discriminant is the method's numeric code as reported in traces
/// (`method=4` is `PUT`).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Method {
    DELETE = 0,
    GET = 1,
    HEAD = 2,
    POST = 3,
    PUT = 4,
    /// Establishes a tunnel; never has a body and always upgrades
    CONNECT = 5,
    OPTIONS = 6,
    TRACE = 7,
    COPY = 8,
    LOCK = 9,
    MKCOL = 10,
    MOVE = 11,
    PROPFIND = 12,
    PROPPATCH = 13,
    SEARCH = 14,
    UNLOCK = 15,
    BIND = 16,
    REBIND = 17,
    UNBIND = 18,
    ACL = 19,
    REPORT = 20,
    MKACTIVITY = 21,
    CHECKOUT = 22,
    MERGE = 23,
    /// `M-SEARCH`
    MSEARCH = 24,
    NOTIFY = 25,
    SUBSCRIBE = 26,
    UNSUBSCRIBE = 27,
    PATCH = 28,
    PURGE = 29,
    MKCALENDAR = 30,
    LINK = 31,
    UNLINK = 32,
    SOURCE = 33,
}

impl Method {
    pub const ALL: [Method; 34] = [
        Method::DELETE,
        Method::GET,
        Method::HEAD,
        Method::POST,
        Method::PUT,
        Method::CONNECT,
        Method::OPTIONS,
        Method::TRACE,
        Method::COPY,
        Method::LOCK,
        Method::MKCOL,
        Method::MOVE,
        Method::PROPFIND,
        Method::PROPPATCH,
        Method::SEARCH,
        Method::UNLOCK,
        Method::BIND,
        Method::REBIND,
        Method::UNBIND,
        Method::ACL,
        Method::REPORT,
        Method::MKACTIVITY,
        Method::CHECKOUT,
        Method::MERGE,
        Method::MSEARCH,
        Method::NOTIFY,
        Method::SUBSCRIBE,
        Method::UNSUBSCRIBE,
        Method::PATCH,
        Method::PURGE,
        Method::MKCALENDAR,
        Method::LINK,
        Method::UNLINK,
        Method::SOURCE,
    ];

    /// Longest method name in the table.
    pub const MAX_LEN: usize = 11;

    /// Wire spelling of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::DELETE => "DELETE",
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::COPY => "COPY",
            Method::LOCK => "LOCK",
            Method::MKCOL => "MKCOL",
            Method::MOVE => "MOVE",
            Method::PROPFIND => "PROPFIND",
            Method::PROPPATCH => "PROPPATCH",
            Method::SEARCH => "SEARCH",
            Method::UNLOCK => "UNLOCK",
            Method::BIND => "BIND",
            Method::REBIND => "REBIND",
            Method::UNBIND => "UNBIND",
            Method::ACL => "ACL",
            Method::REPORT => "REPORT",
            Method::MKACTIVITY => "MKACTIVITY",
            Method::CHECKOUT => "CHECKOUT",
            Method::MERGE => "MERGE",
            Method::MSEARCH => "M-SEARCH",
            Method::NOTIFY => "NOTIFY",
            Method::SUBSCRIBE => "SUBSCRIBE",
            Method::UNSUBSCRIBE => "UNSUBSCRIBE",
            Method::PATCH => "PATCH",
            Method::PURGE => "PURGE",
            Method::MKCALENDAR => "MKCALENDAR",
            Method::LINK => "LINK",
            Method::UNLINK => "UNLINK",
            Method::SOURCE => "SOURCE",
        }
    }

    /// Numeric code used in traces.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Parses an HTTP method from its wire bytes.
    ///
    /// Matching is case-sensitive, as on the wire.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpspan::http::request::Method;
    /// assert_eq!(Method::from_bytes(b"GET"), Some(Method::GET));
    /// assert_eq!(Method::from_bytes(b"M-SEARCH"), Some(Method::MSEARCH));
    /// assert_eq!(Method::from_bytes(b"get"), None);
    /// ```
    pub fn from_bytes(s: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().as_bytes() == s)
    }

    /// Returns `true` if some known method starts with `prefix`.
    pub fn is_known_prefix(prefix: &[u8]) -> bool {
        Self::ALL
            .iter()
            .any(|m| m.as_str().as_bytes().starts_with(prefix))
    }
}

/// An owned HTTP request assembled by
/// [`MessageCollector`](crate::http::collector::MessageCollector).
///
/// Headers keep their wire order and duplicates are not merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target exactly as sent (e.g., "/search?q=rust")
    pub url: String,
    pub version: Version,
    /// Header fields in arrival order
    pub headers: Vec<(String, String)>,
    /// Trailer fields of a chunked body
    pub trailers: Vec<(String, String)>,
    pub flags: Flags,
    pub content_length: Option<u64>,
    pub body: Bytes,
}

impl Request {
    /// Retrieves the first header value with the given name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// All values of a repeated header, in order.
    pub fn header_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Determines whether the connection should remain open after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive unless `Connection: close` was sent;
    /// HTTP/1.0 only keeps the connection with an explicit `keep-alive`.
    pub fn keep_alive(&self) -> bool {
        if self.version.at_least_1_1() {
            !self.flags.contains(Flags::CONNECTION_CLOSE)
        } else {
            self.flags.contains(Flags::CONNECTION_KEEP_ALIVE)
        }
    }
}
