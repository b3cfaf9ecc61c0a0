//! RFC 3986 percent-encoding.
//!
//! Only the unreserved set `A-Z a-z 0-9 - . _ ~` passes through; every other
//! byte of the UTF-8 input becomes `%XX` with uppercase hex digits.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Bytes that must be escaped: everything except the RFC 3986 unreserved set.
pub const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes raw bytes (or a `str` as its UTF-8 bytes).
pub fn encode(input: impl AsRef<[u8]>) -> String {
    percent_encode(input.as_ref(), UNRESERVED).to_string()
}

/// Encodes every key and value, sorts by key then value, and joins the
/// pairs as `k=v` with `&`.
///
/// The output is both the OAuth parameter string and the form body / query
/// string the transport sends, so the two can never disagree.
pub fn encode_pairs<K, V, I>(pairs: I) -> String
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut encoded: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
