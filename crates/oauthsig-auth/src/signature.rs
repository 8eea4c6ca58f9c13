//! OAuth 1.0 signature methods.
//!
//! Each [`SignatureMethod`] maps to one pure function:
//!
//! ```text
//! HMAC-SHA1  = Base64(HMAC-SHA1(enc(consumer_secret) & enc(token_secret), base_string))
//! RSA-SHA1   = Base64(RSASSA-PKCS1-V1_5-SIGN(private_key, base_string))
//! PLAINTEXT  = enc(consumer_secret) & enc(token_secret)
//! ```
//!
//! The value returned here is the raw `oauth_signature`; it is percent-encoded
//! again when the parameter set is serialized onto the request.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use oauthsig_core::{Credentials, SignatureMethod};
use sha1::Sha1;

use crate::encoding::percent_encode;
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Error type returned by an [`RsaSigner`].
pub type RsaSignerError = Box<dyn std::error::Error + Send + Sync>;

/// Capability to sign bytes with the consumer's RSA private key.
///
/// Implementations are expected to produce an RSASSA-PKCS1-v1_5 signature with
/// SHA-1 (RFC 3447 §8.2.1). Key management stays with the implementation.
/// Any `Fn(&[u8]) -> Result<Vec<u8>, RsaSignerError>` closure is an
/// `RsaSigner`.
pub trait RsaSigner: Send + Sync {
    /// Sign `message` and return the raw signature octets.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, RsaSignerError>;
}

impl<F> RsaSigner for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, RsaSignerError> + Send + Sync,
{
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, RsaSignerError> {
        self(message)
    }
}

/// A signature method bound to whatever it needs to produce a signature.
#[derive(Clone, Copy)]
pub enum SigningStrategy<'a> {
    /// HMAC-SHA1 keyed with both secrets.
    HmacSha1,
    /// RSA-SHA1 delegated to an injected signer.
    RsaSha1(&'a dyn RsaSigner),
    /// The encoded secrets, sent as-is.
    Plaintext,
}

impl fmt::Debug for SigningStrategy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

impl SigningStrategy<'_> {
    /// The method this strategy implements.
    #[must_use]
    pub fn method(&self) -> SignatureMethod {
        match self {
            Self::HmacSha1 => SignatureMethod::HmacSha1,
            Self::RsaSha1(_) => SignatureMethod::RsaSha1,
            Self::Plaintext => SignatureMethod::Plaintext,
        }
    }

    /// Whether the signature covers the signature base string.
    ///
    /// PLAINTEXT does not, so callers may skip building one.
    #[must_use]
    pub fn uses_base_string(&self) -> bool {
        !matches!(self, Self::Plaintext)
    }

    /// Compute the `oauth_signature` value.
    ///
    /// `base_string` is ignored by PLAINTEXT.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RsaSigning`] if the injected RSA signer fails.
    pub fn sign(&self, base_string: &str, credentials: &Credentials) -> Result<String, AuthError> {
        match self {
            Self::HmacSha1 => {
                let key = signing_key(credentials.consumer_secret(), credentials.token_secret());
                Ok(hmac_sha1_signature(&key, base_string))
            }
            Self::RsaSha1(signer) => rsa_sha1_signature(*signer, base_string),
            Self::Plaintext => Ok(plaintext_signature(
                credentials.consumer_secret(),
                credentials.token_secret(),
            )),
        }
    }
}

/// Build the shared-secret key `enc(consumer_secret)&enc(token_secret)`.
///
/// The `&` is always present, even when either secret is empty.
///
/// # Examples
///
/// ```
/// use oauthsig_auth::signature::signing_key;
///
/// assert_eq!(signing_key("kd94hf93k423kf44", ""), "kd94hf93k423kf44&");
/// ```
#[must_use]
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

/// Compute the HMAC-SHA1 signature: Base64(HMAC-SHA1(key, base_string)).
#[must_use]
pub fn hmac_sha1_signature(key: &str, base_string: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Compute the RSA-SHA1 signature through the injected signer.
///
/// # Errors
///
/// Returns [`AuthError::RsaSigning`] if the signer fails or returns nothing.
pub fn rsa_sha1_signature(signer: &dyn RsaSigner, base_string: &str) -> Result<String, AuthError> {
    let signature = signer
        .sign(base_string.as_bytes())
        .map_err(|e| AuthError::RsaSigning(e.to_string()))?;
    if signature.is_empty() {
        return Err(AuthError::RsaSigning("signer returned an empty signature".to_owned()));
    }
    Ok(BASE64.encode(signature))
}

/// Compute the PLAINTEXT signature.
///
/// The method offers no integrity protection and must only be sent over a
/// confidential transport such as HTTPS. This is the caller's responsibility;
/// nothing here enforces it.
#[must_use]
pub fn plaintext_signature(consumer_secret: &str, token_secret: &str) -> String {
    signing_key(consumer_secret, token_secret)
}
