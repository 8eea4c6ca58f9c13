//! Signature base string construction for OAuth 1.0.
//!
//! This module implements the signature base string format of RFC 5849 §3.4.1:
//!
//! ```text
//! UPPERCASE(method) & enc(base string URI) & enc(normalized parameters)
//! ```
//!
//! Each component is normalized so that signer and verifier produce the same
//! bytes for the same request.

use tracing::debug;

use crate::encoding::percent_encode;
use crate::error::AuthError;
use crate::params::{OAUTH_SIGNATURE, OAuthParams};

/// Build the full signature base string from its components.
///
/// The order of the three elements is fixed: method, canonical URL,
/// normalized parameters.
///
/// # Errors
///
/// Returns [`AuthError::MalformedUrl`] if the URL has no scheme or host.
///
/// # Examples
///
/// ```
/// use oauthsig_auth::canonical::build_signature_base_string;
/// use oauthsig_auth::params::OAuthParams;
///
/// let mut oauth = OAuthParams::new();
/// oauth.insert("oauth_nonce", "n");
/// let base = build_signature_base_string(
///     "get",
///     "HTTP://Example.com:80/r?x=1",
///     &oauth,
///     &[("x".to_owned(), "1".to_owned())],
///     &[],
/// )
/// .unwrap();
/// assert_eq!(base, "GET&http%3A%2F%2Fexample.com%2Fr&oauth_nonce%3Dn%26x%3D1");
/// ```
pub fn build_signature_base_string(
    method: &str,
    url: &str,
    oauth_params: &OAuthParams,
    query_params: &[(String, String)],
    body_params: &[(String, String)],
) -> Result<String, AuthError> {
    let method = method.to_ascii_uppercase();
    let canonical_url = canonicalize_url(url)?;
    let normalized = normalize_parameters(oauth_params, query_params, body_params);

    let base_string = format!(
        "{}&{}&{}",
        percent_encode(&method),
        percent_encode(&canonical_url),
        percent_encode(&normalized)
    );

    debug!(base_string, "Built signature base string");

    Ok(base_string)
}

/// Build the base string URI: scheme, authority, and path only.
///
/// Scheme and host are lowercased, the default port of `http` (80) and `https`
/// (443) is dropped, and the path is kept byte for byte. Query, fragment and
/// userinfo are discarded. An empty path is rendered as `/`.
///
/// # Errors
///
/// Returns [`AuthError::MalformedUrl`] if the input is not an absolute URL.
///
/// # Examples
///
/// ```
/// use oauthsig_auth::canonical::canonicalize_url;
///
/// assert_eq!(
///     canonicalize_url("HTTP://Example.com:80/resource?id=123").unwrap(),
///     "http://example.com/resource"
/// );
/// assert_eq!(
///     canonicalize_url("https://example.com:8443/r").unwrap(),
///     "https://example.com:8443/r"
/// );
/// ```
pub fn canonicalize_url(url: &str) -> Result<String, AuthError> {
    let uri: http::Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| AuthError::MalformedUrl(format!("{url}: {e}")))?;

    let scheme = uri
        .scheme_str()
        .ok_or_else(|| AuthError::MalformedUrl(format!("{url}: missing scheme")))?
        .to_ascii_lowercase();
    let host = uri
        .host()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| AuthError::MalformedUrl(format!("{url}: missing host")))?
        .to_ascii_lowercase();
    let path = uri.path();

    if uri.port().is_some() && uri.port_u16().is_none() {
        return Err(AuthError::MalformedUrl(format!("{url}: port out of range")));
    }

    match uri.port_u16() {
        Some(port) if !is_default_port(&scheme, port) => {
            Ok(format!("{scheme}://{host}:{port}{path}"))
        }
        _ => Ok(format!("{scheme}://{host}{path}")),
    }
}

/// Build the normalized parameter string.
///
/// Parameters from all three sources are flattened into one list (repeated
/// names stay separate pairs), `oauth_signature` is dropped from every source
/// and `realm` from the protocol parameters, names and values are
/// percent-encoded, and the pairs are sorted by encoded name then encoded
/// value before being joined as `name=value&...`.
///
/// # Examples
///
/// ```
/// use oauthsig_auth::canonical::normalize_parameters;
/// use oauthsig_auth::params::OAuthParams;
///
/// let query = vec![
///     ("f".to_owned(), "50".to_owned()),
///     ("c".to_owned(), "hi there".to_owned()),
///     ("f".to_owned(), "25".to_owned()),
///     ("a".to_owned(), "1".to_owned()),
/// ];
/// assert_eq!(
///     normalize_parameters(&OAuthParams::new(), &query, &[]),
///     "a=1&c=hi%20there&f=25&f=50"
/// );
/// ```
#[must_use]
pub fn normalize_parameters(
    oauth_params: &OAuthParams,
    query_params: &[(String, String)],
    body_params: &[(String, String)],
) -> String {
    let extra = query_params
        .iter()
        .chain(body_params)
        .filter(|(name, _)| name != OAUTH_SIGNATURE)
        .map(|(name, value)| (name.as_str(), value.as_str()));

    let mut encoded: Vec<(String, String)> = oauth_params
        .signing_pairs()
        .chain(extra)
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect();

    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn is_default_port(scheme: &str, port: u16) -> bool {
    matches!((scheme, port), ("http", 80) | ("https", 443))
}
