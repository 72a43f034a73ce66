/// Where to go once the LF of a CRLF pair arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Next {
    HeaderStart,
    HeadersDone,
    ChunkHeaderDone,
    ChunkComplete,
}

/// Position of the parser within the message grammar.
///
/// Each state consumes one byte, except the body states which take as many
/// bytes as the framing allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Before the first byte of a message; empty lines are skipped here
    Start,

    // request line
    Method,
    BeforeUrl,
    Url,
    BeforeVersion,

    // version, shared by both start-lines
    VersionLiteral(u8),
    VersionMajor,
    VersionDot,
    VersionMinor,
    AfterVersion,

    // status line
    BeforeStatusCode,
    StatusCode(u8),
    AfterStatusCode,
    BeforeReason,
    Reason,

    // header and trailer sections
    HeaderStart,
    HeaderField,
    AfterField,
    BeforeValue,
    HeaderValue,

    ExpectLf(Next),

    Body,
    BodyUntilEof,

    ChunkSizeStart,
    ChunkSize,
    ChunkSizeWs,
    ChunkExtensionStart,
    ChunkExtension,
    ChunkData,
    ChunkDataEnd,

    /// A message completed; what follows depends on the restart setting
    Done,
}

impl State {
    /// States whose bytes count toward `max_header_size`.
    pub(crate) fn in_head(&self) -> bool {
        matches!(
            self,
            State::Start
                | State::Method
                | State::BeforeUrl
                | State::Url
                | State::BeforeVersion
                | State::VersionLiteral(_)
                | State::VersionMajor
                | State::VersionDot
                | State::VersionMinor
                | State::AfterVersion
                | State::BeforeStatusCode
                | State::StatusCode(_)
                | State::AfterStatusCode
                | State::BeforeReason
                | State::Reason
                | State::HeaderStart
                | State::HeaderField
                | State::AfterField
                | State::BeforeValue
                | State::HeaderValue
                | State::ExpectLf(Next::HeaderStart | Next::HeadersDone)
        )
    }

    /// States inside a body, where end of stream is premature.
    pub(crate) fn in_body(&self) -> bool {
        matches!(
            self,
            State::Body
                | State::ChunkSizeStart
                | State::ChunkSize
                | State::ChunkSizeWs
                | State::ChunkExtensionStart
                | State::ChunkExtension
                | State::ChunkData
                | State::ChunkDataEnd
                | State::ExpectLf(Next::ChunkHeaderDone | Next::ChunkComplete)
        )
    }
}
