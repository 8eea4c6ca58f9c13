//! Percent-encoding rules shared by every stage of the signing pipeline.
//!
//! OAuth 1.0 uses the RFC 3986 unreserved set: `A-Z`, `a-z`, `0-9`, `-`, `.`,
//! `_` and `~` pass through, every other UTF-8 byte becomes `%XX` with
//! uppercase hex digits. A space is always `%20`, never `+`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode, utf8_percent_encode};

use crate::error::AuthError;

/// The set of characters that must be percent-encoded in OAuth parameters.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string using the OAuth unreserved-character rules.
///
/// # Examples
///
/// ```
/// use oauthsig_auth::encoding::percent_encode;
///
/// assert_eq!(percent_encode("hi there"), "hi%20there");
/// assert_eq!(percent_encode("a-b_c.d~e"), "a-b_c.d~e");
/// assert_eq!(percent_encode("jjd99$tj88uiths3"), "jjd99%24tj88uiths3");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Decode a percent-encoded component (header parameter names and values).
///
/// `+` is kept literally.
pub fn percent_decode_component(input: &str) -> Result<String, AuthError> {
    decode_utf8(input.as_bytes())
}

/// Decode an `application/x-www-form-urlencoded` component, where `+` means
/// a space.
pub fn form_decode_component(input: &[u8]) -> Result<String, AuthError> {
    let unplussed: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    decode_utf8(&unplussed)
}

/// Parse `application/x-www-form-urlencoded` input (a query string or a form
/// body) into decoded pairs.
///
/// Repeated names are preserved as separate pairs, in input order. A pair
/// without `=` decodes to an empty value.
///
/// # Errors
///
/// Returns [`AuthError::Encoding`] when a decoded name or value is not valid
/// UTF-8.
pub fn parse_form_pairs(input: &[u8]) -> Result<Vec<(String, String)>, AuthError> {
    input
        .split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = match pair.iter().position(|&b| b == b'=') {
                Some(idx) => (&pair[..idx], &pair[idx + 1..]),
                None => (pair, &[][..]),
            };
            Ok((form_decode_component(name)?, form_decode_component(value)?))
        })
        .collect()
}

/// Serialize pairs as `application/x-www-form-urlencoded` text.
#[must_use]
pub fn form_encode_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn decode_utf8(input: &[u8]) -> Result<String, AuthError> {
    percent_decode(input)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| AuthError::Encoding(e.to_string()))
}
