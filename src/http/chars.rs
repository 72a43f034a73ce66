//! Byte classes of the HTTP/1.x grammar.

/// RFC 9110 `tchar`.
pub(crate) fn is_token(b: u8) -> bool {
    matches!(b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.'
        | b'^' | b'_' | b'`' | b'|' | b'~')
        || b.is_ascii_alphanumeric()
}

pub(crate) fn is_ows(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Strict field-value byte: HTAB, SP, VCHAR or obs-text.
pub(crate) fn is_field_vchar(b: u8) -> bool {
    b == b'\t' || b == b' ' || (0x21..=0x7e).contains(&b) || b >= 0x80
}

/// Strict request-target byte.
pub(crate) fn is_url_char(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

pub(crate) fn is_lenient_url_char(b: u8) -> bool {
    is_url_char(b) || b == b'\t' || b >= 0x80
}

/// Lenient header name byte: anything visible except the separator.
pub(crate) fn is_lenient_name_char(b: u8) -> bool {
    b > b' ' && b != b':' && b != 0x7f
}

pub(crate) fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
