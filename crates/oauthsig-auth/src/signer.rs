//! Request signing.
//!
//! [`RequestSigner`] drives the whole pipeline for one request:
//!
//! 1. Assemble the protocol parameters (consumer key, method, timestamp,
//!    nonce, version, token, callback).
//! 2. Build the signature base string from the request method, URL, query
//!    parameters, and form body parameters.
//! 3. Compute `oauth_signature` with the selected [`SigningStrategy`].
//! 4. Attach the full parameter set: appended to the query string for `GET`,
//!    as an `Authorization` header otherwise.
//!
//! Steps 1 to 3 only read the request. The request is modified in step 4 and
//! only after everything else succeeded, so a failed call leaves it untouched.

use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::{HeaderValue, Method};
use oauthsig_core::{Credentials, HeaderStyle, OAuthConfig, SignatureMethod};
use tracing::{debug, warn};

use crate::canonical::{build_signature_base_string, canonicalize_url};
use crate::error::AuthError;
use crate::nonce::NonceSource;
use crate::params::{
    OAUTH_CALLBACK, OAUTH_CONSUMER_KEY, OAUTH_NONCE, OAUTH_SIGNATURE, OAUTH_SIGNATURE_METHOD,
    OAUTH_TIMESTAMP, OAUTH_TOKEN, OAUTH_VERSION, OAuthParams, REALM, VERSION_1_0,
};
use crate::request::{RequestDescriptor, append_query};
use crate::signature::{RsaSigner, SigningStrategy};

/// How a signature is attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Replace the request URL (the OAuth pairs are already appended).
    Url(String),
    /// Set the `Authorization` header to this value.
    Header(HeaderValue),
}

impl Attachment {
    /// Apply the attachment, mutating exactly one of URL or headers.
    pub fn apply(self, request: &mut RequestDescriptor) {
        match self {
            Self::Url(url) => request.set_url(url),
            Self::Header(value) => request.insert_header(AUTHORIZATION, value),
        }
    }
}

/// Signs requests on behalf of one consumer (and optionally one token).
///
/// Holds only immutable configuration, so a single signer can be shared
/// across threads.
#[derive(Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    callback: Option<String>,
    realm: Option<String>,
    header_style: HeaderStyle,
    rsa_signer: Option<Arc<dyn RsaSigner>>,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("credentials", &self.credentials)
            .field("callback", &self.callback)
            .field("realm", &self.realm)
            .field("header_style", &self.header_style)
            .field("rsa_signer", &self.rsa_signer.is_some())
            .finish()
    }
}

impl RequestSigner {
    /// Create a signer for the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            callback: None,
            realm: None,
            header_style: HeaderStyle::default(),
            rsa_signer: None,
        }
    }

    /// Create a signer from an [`OAuthConfig`].
    #[must_use]
    pub fn from_config(config: &OAuthConfig) -> Self {
        let mut signer = Self::new(config.credentials()).with_header_style(config.header_style);
        signer.callback.clone_from(&config.callback);
        signer.realm.clone_from(&config.realm);
        signer
    }

    /// Emit `oauth_callback` with every request.
    #[must_use]
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// Emit `realm` at the front of the `Authorization` header.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Choose the `Authorization` header serialization.
    #[must_use]
    pub fn with_header_style(mut self, style: HeaderStyle) -> Self {
        self.header_style = style;
        self
    }

    /// Enable RSA-SHA1 through an injected private-key signer.
    #[must_use]
    pub fn with_rsa_signer(mut self, signer: Arc<dyn RsaSigner>) -> Self {
        self.rsa_signer = Some(signer);
        self
    }

    /// The credentials this signer signs with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolve the strategy for `method`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedSignatureMethod`] for RSA-SHA1 when no
    /// RSA signer was injected.
    pub fn strategy(&self, method: SignatureMethod) -> Result<SigningStrategy<'_>, AuthError> {
        match method {
            SignatureMethod::HmacSha1 => Ok(SigningStrategy::HmacSha1),
            SignatureMethod::Plaintext => Ok(SigningStrategy::Plaintext),
            SignatureMethod::RsaSha1 => match &self.rsa_signer {
                Some(signer) => Ok(SigningStrategy::RsaSha1(signer.as_ref())),
                None => Err(AuthError::UnsupportedSignatureMethod(format!(
                    "{method} requires an RSA signer"
                ))),
            },
        }
    }

    /// Sign `request` in place with an explicit nonce and timestamp.
    ///
    /// # Errors
    ///
    /// Any error from [`RequestSigner::prepare`]. The request is unchanged
    /// when an error is returned.
    pub fn sign(
        &self,
        request: &mut RequestDescriptor,
        method: SignatureMethod,
        nonce: &str,
        timestamp: i64,
    ) -> Result<(), AuthError> {
        let attachment = self.prepare(request, method, nonce, timestamp)?;
        attachment.apply(request);
        Ok(())
    }

    /// Sign `request` in place, drawing nonce and timestamp from `source`.
    ///
    /// # Errors
    ///
    /// Same as [`RequestSigner::sign`].
    pub fn sign_with(
        &self,
        request: &mut RequestDescriptor,
        method: SignatureMethod,
        source: &dyn NonceSource,
    ) -> Result<(), AuthError> {
        self.sign(request, method, &source.nonce(), source.timestamp())
    }

    /// Compute the signed parameter set for `request` without touching it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedSignatureMethod`] when the method has
    /// no implementation, [`AuthError::MalformedUrl`] or
    /// [`AuthError::Encoding`] for an unusable URL or body, and
    /// [`AuthError::RsaSigning`] when the RSA signer fails.
    pub fn signed_params(
        &self,
        request: &RequestDescriptor,
        method: SignatureMethod,
        nonce: &str,
        timestamp: i64,
    ) -> Result<OAuthParams, AuthError> {
        let strategy = self.strategy(method)?;
        let mut params = self.protocol_params(method, nonce, timestamp);

        let canonical_url = canonicalize_url(request.url())?;
        if strategy.method() == SignatureMethod::Plaintext && !canonical_url.starts_with("https://")
        {
            warn!(url = %canonical_url, "PLAINTEXT signature sent over a non-TLS URL");
        }

        let base_string = if strategy.uses_base_string() {
            build_signature_base_string(
                request.method().as_str(),
                request.url(),
                &params,
                &request.query_params()?,
                request.body_params(),
            )?
        } else {
            String::new()
        };

        let signature = strategy.sign(&base_string, &self.credentials)?;
        params.insert(OAUTH_SIGNATURE, signature);
        Ok(params)
    }

    /// Compute how `request` would be signed, without touching it.
    ///
    /// # Errors
    ///
    /// Everything [`RequestSigner::signed_params`] returns, plus
    /// [`AuthError::ParameterCollision`] when a `GET` URL already carries an
    /// OAuth parameter this signer emits.
    pub fn prepare(
        &self,
        request: &RequestDescriptor,
        method: SignatureMethod,
        nonce: &str,
        timestamp: i64,
    ) -> Result<Attachment, AuthError> {
        let mut params = self.signed_params(request, method, nonce, timestamp)?;

        debug!(
            consumer_key = %self.credentials.consumer_key(),
            signature_method = %method,
            http_method = %request.method(),
            url = %request.url(),
            "Signed request"
        );

        if *request.method() == Method::GET {
            if let Some((name, _)) = request
                .query_params()?
                .into_iter()
                .find(|(name, _)| params.contains(name))
            {
                return Err(AuthError::ParameterCollision(name));
            }
            Ok(Attachment::Url(append_query(
                request.url(),
                &params.to_query_string(),
            )))
        } else {
            if let Some(realm) = &self.realm {
                params.insert(REALM, realm.as_str());
            }
            let value = HeaderValue::from_str(&params.to_header_value(self.header_style))
                .map_err(|e| AuthError::InvalidHeaderValue(e.to_string()))?;
            Ok(Attachment::Header(with_sensitive(value)))
        }
    }

    fn protocol_params(&self, method: SignatureMethod, nonce: &str, timestamp: i64) -> OAuthParams {
        let mut params = OAuthParams::new();
        params.insert(OAUTH_CONSUMER_KEY, self.credentials.consumer_key());
        params.insert(OAUTH_SIGNATURE_METHOD, method.as_str());
        params.insert(OAUTH_TIMESTAMP, timestamp.to_string());
        params.insert(OAUTH_NONCE, nonce);
        params.insert(OAUTH_VERSION, VERSION_1_0);
        if let Some(token) = self.credentials.token() {
            params.insert(OAUTH_TOKEN, token);
        }
        if let Some(callback) = &self.callback {
            params.insert(OAUTH_CALLBACK, callback.as_str());
        }
        params
    }
}

fn with_sensitive(mut value: HeaderValue) -> HeaderValue {
    value.set_sensitive(true);
    value
}
