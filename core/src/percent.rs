//! Percent-encoding policy for path segments
//!
//! Parameter values are encoded on assembly and decoded on match. The encode
//! set leaves the RFC 3986 `unreserved` characters and the path sub-delims
//! (`!$&'()*+,:;=@`) untouched and percent-encodes everything else — so a
//! space always becomes `%20`, never `+`. Literal pattern text is emitted
//! verbatim and never passes through here.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except alphanumerics, `unreserved` punctuation and the path
/// sub-delimiter set.
const SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    // unreserved
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    // sub-delims valid in a path segment
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Percent-encode a parameter value for emission into a path.
pub(crate) fn encode(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT_SET).to_string()
}

/// Percent-decode a captured parameter value.
///
/// Decoding is total: invalid UTF-8 sequences decode lossily rather than
/// failing the match. Raw and percent-encoded spellings of characters in
/// the untouched set decode to the identical value.
pub(crate) fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}
