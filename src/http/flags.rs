bitflags::bitflags! {
    /// Framing and connection properties of the message being parsed.
    ///
    /// Bits are independent; `Connection: close, keep-alive` sets both
    /// connection flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const CONNECTION_KEEP_ALIVE = 0x01;
        const CONNECTION_CLOSE = 0x02;
        const CONNECTION_UPGRADE = 0x04;
        const CHUNKED = 0x08;
        /// An `Upgrade` header was present
        const UPGRADE = 0x10;
        const CONTENT_LENGTH = 0x20;
        const SKIP_BODY = 0x40;
        /// Trailer fields followed the last chunk
        const TRAILING = 0x80;
    }
}
