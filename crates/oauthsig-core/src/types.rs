//! Common OAuth 1.0 type definitions shared across the workspace.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// OAuth 1.0 signature method.
///
/// The set is closed: each variant maps to exactly one signing function and
/// one `oauth_signature_method` wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum SignatureMethod {
    /// HMAC-SHA1 over the signature base string (RFC 5849 §3.4.2).
    #[default]
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,
    /// RSASSA-PKCS1-v1_5 with SHA-1 over the signature base string (RFC 5849 §3.4.3).
    #[serde(rename = "RSA-SHA1")]
    RsaSha1,
    /// The encoded secrets themselves (RFC 5849 §3.4.4). Only safe over TLS.
    #[serde(rename = "PLAINTEXT")]
    Plaintext,
}

impl SignatureMethod {
    /// The `oauth_signature_method` value emitted for this method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::RsaSha1 => "RSA-SHA1",
            Self::Plaintext => "PLAINTEXT",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "HMAC-SHA1" => Ok(Self::HmacSha1),
            "RSA-SHA1" => Ok(Self::RsaSha1),
            "PLAINTEXT" => Ok(Self::Plaintext),
            _ => Err(CoreError::UnknownSignatureMethod(s.to_owned())),
        }
    }
}

/// Serialization used for the `Authorization: OAuth ...` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// `name="value"` pairs joined by `, ` (RFC 5849 §3.5.1).
    #[default]
    Quoted,
    /// `name=value` pairs joined by `&`.
    Form,
}

impl FromStr for HeaderStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quoted" | "rfc5849" => Ok(Self::Quoted),
            "form" | "form-encoded" => Ok(Self::Form),
            _ => Err(CoreError::UnknownHeaderStyle(s.to_owned())),
        }
    }
}

/// Consumer and token credentials used to sign requests.
///
/// Absent token fields are stored as empty strings: the HMAC-SHA1 and
/// PLAINTEXT keys always have the form `consumer_secret&token_secret`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl Credentials {
    /// Create consumer-only credentials.
    #[must_use]
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: String::new(),
            token_secret: String::new(),
        }
    }

    /// Attach a token key and secret.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        self.token = token.into();
        self.token_secret = token_secret.into();
        self
    }

    /// The consumer key.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// The consumer secret.
    #[must_use]
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// The token key, or `None` when no token is attached.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        (!self.token.is_empty()).then_some(self.token.as_str())
    }

    /// The token secret, empty when unset.
    #[must_use]
    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}
