//! Percent-encoding helpers for query strings.
//!
//! `form_encode` matches `URLSearchParams::toString` and `encode_uri_component`
//! matches the JS global of the same name, so URLs built natively are
//! byte-identical to the ones the browser would produce.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes `encodeURIComponent` leaves as-is besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serialize pairs as `application/x-www-form-urlencoded`.
pub fn form_encode<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(key, value)| (key.as_ref(), value.as_ref())))
        .finish()
}

/// Encode one URI component, leaving `A-Z a-z 0-9 - _ . ! ~ * ' ( )` intact.
pub fn encode_uri_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}
