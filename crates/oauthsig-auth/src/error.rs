//! Error types for OAuth 1.0 signing and verification.
//!
//! All failures are represented by [`AuthError`]. Signing failures are raised
//! before the request is touched, so a request passed to a failing call is left
//! exactly as it was.

/// Errors that can occur while signing or verifying an OAuth 1.0 request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request URL cannot be split into scheme, authority, and path.
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// The selected signature method has no working implementation.
    #[error("Unsupported signature method: {0}")]
    UnsupportedSignatureMethod(String),

    /// A parameter could not be decoded as UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The URL already carries a protocol parameter that signing would add.
    #[error("Query string already contains protocol parameter: {0}")]
    ParameterCollision(String),

    /// The injected RSA signer failed.
    #[error("RSA signing failed: {0}")]
    RsaSigning(String),

    /// The serialized parameters do not form a valid header value.
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// No OAuth parameters were found in the header, body, or query string.
    #[error("Missing OAuth authorization")]
    MissingAuthorization,

    /// The `Authorization: OAuth` header could not be parsed.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// A required protocol parameter is absent.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// `oauth_version` is present but not `1.0`.
    #[error("Unsupported oauth_version: {0}")]
    UnsupportedVersion(String),

    /// The consumer key was not found in the secret store.
    #[error("Consumer key not found: {0}")]
    ConsumerKeyNotFound(String),

    /// The token was not found in the secret store.
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    /// `oauth_timestamp` lies outside the accepted clock skew.
    #[error("Request has expired")]
    RequestExpired,

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
