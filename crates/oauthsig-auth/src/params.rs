//! The OAuth protocol parameter set and its wire serializations.
//!
//! The parameter set is carried either in the `Authorization` header:
//!
//! ```text
//! OAuth realm="Photos", oauth_consumer_key="dpf43f3p2l4k3l03", ...
//! ```
//!
//! or as `application/x-www-form-urlencoded` pairs in the query string.

use std::collections::BTreeMap;

use oauthsig_core::HeaderStyle;

use crate::encoding::{form_encode_pairs, percent_decode_component, percent_encode};
use crate::error::AuthError;

/// `oauth_consumer_key`
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// `oauth_token`
pub const OAUTH_TOKEN: &str = "oauth_token";
/// `oauth_signature_method`
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
/// `oauth_timestamp`
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
/// `oauth_nonce`
pub const OAUTH_NONCE: &str = "oauth_nonce";
/// `oauth_version`
pub const OAUTH_VERSION: &str = "oauth_version";
/// `oauth_callback`
pub const OAUTH_CALLBACK: &str = "oauth_callback";
/// `oauth_signature`, the one parameter never fed into the base string.
pub const OAUTH_SIGNATURE: &str = "oauth_signature";
/// `realm`, emitted in the header only and never signed.
pub const REALM: &str = "realm";

/// The only protocol version this crate emits and accepts.
pub const VERSION_1_0: &str = "1.0";

/// Authentication scheme prefix of the `Authorization` header.
const OAUTH_SCHEME: &str = "OAuth";

/// The protocol parameters of one request.
///
/// Order of insertion is irrelevant; iteration is always sorted by name so
/// serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthParams {
    params: BTreeMap<String, String>,
}

impl OAuthParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(name.into(), value.into())
    }

    /// Look up a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Look up a parameter that must be present.
    pub fn require(&self, name: &str) -> Result<&str, AuthError> {
        self.get(name)
            .ok_or_else(|| AuthError::MissingParameter(name.to_owned()))
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.params.remove(name)
    }

    /// Whether a parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// All parameters, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parameters that take part in the signature base string: everything but
    /// `oauth_signature` and `realm`.
    pub fn signing_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(name, _)| *name != OAUTH_SIGNATURE && *name != REALM)
    }

    /// Serialize as the value of an `Authorization` header.
    ///
    /// `realm`, when present, comes first.
    ///
    /// # Examples
    ///
    /// ```
    /// use oauthsig_auth::params::OAuthParams;
    /// use oauthsig_core::HeaderStyle;
    ///
    /// let mut params = OAuthParams::new();
    /// params.insert("oauth_nonce", "a b");
    /// params.insert("realm", "Photos");
    /// assert_eq!(
    ///     params.to_header_value(HeaderStyle::Quoted),
    ///     r#"OAuth realm="Photos", oauth_nonce="a%20b""#
    /// );
    /// assert_eq!(
    ///     params.to_header_value(HeaderStyle::Form),
    ///     "OAuth realm=Photos&oauth_nonce=a%20b"
    /// );
    /// ```
    #[must_use]
    pub fn to_header_value(&self, style: HeaderStyle) -> String {
        let ordered = self
            .get(REALM)
            .map(|realm| (REALM, realm))
            .into_iter()
            .chain(self.iter().filter(|(name, _)| *name != REALM));

        let body = match style {
            HeaderStyle::Quoted => ordered
                .map(|(name, value)| {
                    format!("{}=\"{}\"", percent_encode(name), percent_encode(value))
                })
                .collect::<Vec<_>>()
                .join(", "),
            HeaderStyle::Form => ordered
                .map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
                .collect::<Vec<_>>()
                .join("&"),
        };

        format!("{OAUTH_SCHEME} {body}")
    }

    /// Serialize as `application/x-www-form-urlencoded` query pairs.
    ///
    /// `realm` is header-only and is left out.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_encode_pairs(self.iter().filter(|(name, _)| *name != REALM))
    }

    /// Parse the value of an `Authorization: OAuth ...` header.
    ///
    /// Both serializations produced by [`OAuthParams::to_header_value`] are
    /// accepted: quoted values separated by `,`, and bare values separated by
    /// `&`. Names and values are percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidAuthHeader`] if the scheme is not `OAuth`,
    /// a pair has no `=`, or a parameter is repeated, and
    /// [`AuthError::Encoding`] if a component does not decode to UTF-8.
    pub fn parse_authorization_header(header: &str) -> Result<Self, AuthError> {
        let rest = strip_scheme(header.trim_start()).ok_or(AuthError::InvalidAuthHeader)?;

        let mut params = Self::new();
        for part in split_unquoted(rest).ok_or(AuthError::InvalidAuthHeader)? {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (name, value) = part.split_once('=').ok_or(AuthError::InvalidAuthHeader)?;
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);

            let name = percent_decode_component(name.trim())?;
            let value = percent_decode_component(value)?;
            if params.insert(name, value).is_some() {
                return Err(AuthError::InvalidAuthHeader);
            }
        }

        if params.is_empty() {
            return Err(AuthError::InvalidAuthHeader);
        }

        Ok(params)
    }

    /// Collect the protocol parameters (`oauth_*`) out of decoded pairs.
    ///
    /// Returns `Ok(None)` when no pair is a protocol parameter.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidAuthHeader`] if a protocol parameter is
    /// repeated.
    pub fn from_protocol_pairs(pairs: &[(String, String)]) -> Result<Option<Self>, AuthError> {
        let mut params = Self::new();
        for (name, value) in pairs.iter().filter(|(name, _)| name.starts_with("oauth_")) {
            if params.insert(name.as_str(), value.as_str()).is_some() {
                return Err(AuthError::InvalidAuthHeader);
            }
        }
        Ok((!params.is_empty()).then_some(params))
    }
}

/// Whether an `Authorization` header value uses the `OAuth` scheme.
#[must_use]
pub fn is_oauth_header(header: &str) -> bool {
    strip_scheme(header.trim_start()).is_some()
}

/// Split on `,` and `&` outside double quotes. `None` if a quote is unclosed.
fn split_unquoted(input: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in input.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' | '&' if !quoted => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    (!quoted).then_some(parts)
}

fn strip_scheme(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    scheme.eq_ignore_ascii_case(OAUTH_SCHEME).then_some(rest)
}
