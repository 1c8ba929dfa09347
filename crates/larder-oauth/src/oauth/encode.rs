//! RFC 3986 percent-encoding as required by OAuth 1.0a (RFC 5849 Section 3.6).

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
///
/// Everything else, including `! ' ( ) *`, is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string per RFC 3986 unreserved rules.
pub fn oauth_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Serialize pairs as `k=v&k=v` using [`oauth_encode`] on both sides.
pub(crate) fn form_encode<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", oauth_encode(k), oauth_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode an `application/x-www-form-urlencoded` body into a flat mapping.
///
/// Segments without `=` are skipped. Later duplicates overwrite earlier ones.
pub(crate) fn form_decode(body: &str) -> BTreeMap<String, String> {
    body.trim()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (decode_component(k), decode_component(v)))
        .collect()
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}
