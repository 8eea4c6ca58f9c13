//! Error types for the OAuthSig core.

/// Core error type for OAuthSig configuration and shared types.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Unknown `oauth_signature_method` name.
    #[error("unknown signature method: {0} (expected HMAC-SHA1, RSA-SHA1 or PLAINTEXT)")]
    UnknownSignatureMethod(String),

    /// Unknown `Authorization` header style.
    #[error("unknown header style: {0} (expected quoted or form)")]
    UnknownHeaderStyle(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for OAuthSig core operations.
pub type CoreResult<T> = Result<T, CoreError>;
