//! The outgoing request as seen by the signer.
//!
//! A [`RequestDescriptor`] holds exactly what goes into a signature: the
//! method, the absolute URL (whose query string carries the query
//! parameters), the form-encoded body parameters, and the headers. Signing
//! mutates either the URL or the headers, never both.

use http::header::{CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderName, HeaderValue, Method};

use crate::encoding::{form_encode_pairs, parse_form_pairs};
use crate::error::AuthError;

/// Media type whose body parameters take part in the signature.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// An HTTP request to be signed or verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    body_params: Vec<(String, String)>,
    headers: HeaderMap,
}

impl RequestDescriptor {
    /// Create a request with no body parameters and no headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body_params: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Build a descriptor from received request parts and body.
    ///
    /// When the request target is not absolute, the URL is rebuilt from
    /// `scheme`, the `Host` header, and the request path. Body parameters are
    /// read only when the `Content-Type` is `application/x-www-form-urlencoded`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedUrl`] if no host is known, and
    /// [`AuthError::Encoding`] if the form body does not decode to UTF-8.
    pub fn from_parts(
        parts: &http::request::Parts,
        scheme: &str,
        body: &[u8],
    ) -> Result<Self, AuthError> {
        let url = if parts.uri.scheme().is_some() {
            parts.uri.to_string()
        } else {
            let host = parts
                .headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AuthError::MalformedUrl(format!("{}: no Host header", parts.uri)))?;
            let path_and_query = parts
                .uri
                .path_and_query()
                .map_or("/", http::uri::PathAndQuery::as_str);
            format!("{scheme}://{host}{path_and_query}")
        };

        let mut request = Self::new(parts.method.clone(), url);
        request.headers.clone_from(&parts.headers);
        if request.is_form_encoded() {
            request.body_params = parse_form_pairs(body)?;
        }
        Ok(request)
    }

    /// Append a query parameter to the URL.
    #[must_use]
    pub fn with_query_param(mut self, name: &str, value: &str) -> Self {
        self.url = append_query(&self.url, &form_encode_pairs([(name, value)]));
        self
    }

    /// Add a form body parameter and mark the body as form-encoded.
    #[must_use]
    pub fn with_form_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        self.body_params.push((name.into(), value.into()));
        self
    }

    /// Replace the body parameters with those decoded from a form body.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encoding`] if the body does not decode to UTF-8.
    pub fn with_form_body(mut self, body: &[u8]) -> Result<Self, AuthError> {
        self.body_params = parse_form_pairs(body)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        Ok(self)
    }

    /// Set a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute URL, including any query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The decoded form body parameters, in body order.
    #[must_use]
    pub fn body_params(&self) -> &[(String, String)] {
        &self.body_params
    }

    /// The form body to transmit, `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn form_body(&self) -> String {
        form_encode_pairs(
            self.body_params
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }

    /// The decoded query parameters of the URL, in URL order.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedUrl`] if the URL cannot be parsed, and
    /// [`AuthError::Encoding`] if a parameter does not decode to UTF-8.
    pub fn query_params(&self) -> Result<Vec<(String, String)>, AuthError> {
        let uri: http::Uri = self
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| AuthError::MalformedUrl(format!("{}: {e}", self.url)))?;
        parse_form_pairs(uri.query().unwrap_or_default().as_bytes())
    }

    /// Whether the body is `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn is_form_encoded(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_URLENCODED))
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = url;
    }

    pub(crate) fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }
}

/// Append encoded query pairs to a URL, before any fragment.
pub(crate) fn append_query(url: &str, encoded_pairs: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let separator = match base.split_once('?') {
        Some((_, "")) => "",
        Some(_) => "&",
        None => "?",
    };

    match fragment {
        Some(fragment) => format!("{base}{separator}{encoded_pairs}#{fragment}"),
        None => format!("{base}{separator}{encoded_pairs}"),
    }
}
