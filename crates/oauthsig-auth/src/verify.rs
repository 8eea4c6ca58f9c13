//! OAuth 1.0 signature verification (service provider side).
//!
//! This module implements the verification flow:
//!
//! 1. Locate the protocol parameters: the `Authorization: OAuth` header first,
//!    then the form body, then the query string.
//! 2. Check `oauth_version`, the required parameters, and the timestamp skew.
//! 3. Resolve the consumer and token secrets via the [`SecretProvider`].
//! 4. Rebuild the signature base string and compute the expected signature.
//! 5. Compare signatures using constant-time comparison.
//!
//! Nonce bookkeeping is left to the caller: the verified nonce and timestamp
//! are returned in [`VerifiedRequest`].

use std::collections::HashMap;

use chrono::{TimeDelta, Utc};
use oauthsig_core::{Credentials, SignatureMethod};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::build_signature_base_string;
use crate::error::AuthError;
use crate::params::{
    OAUTH_CONSUMER_KEY, OAUTH_NONCE, OAUTH_SIGNATURE, OAUTH_SIGNATURE_METHOD, OAUTH_TIMESTAMP,
    OAUTH_TOKEN, OAUTH_VERSION, OAuthParams, VERSION_1_0, is_oauth_header,
};
use crate::request::RequestDescriptor;
use crate::signature::SigningStrategy;

/// Trait for looking up consumer and token secrets.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store.
pub trait SecretProvider: Send + Sync {
    /// Retrieve the consumer secret for `consumer_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ConsumerKeyNotFound`] if the key is not recognized.
    fn consumer_secret(&self, consumer_key: &str) -> Result<String, AuthError>;

    /// Retrieve the token secret for `token` issued to `consumer_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenNotFound`] if the token is not recognized.
    fn token_secret(&self, consumer_key: &str, token: &str) -> Result<String, AuthError>;
}

/// A simple in-memory secret provider backed by `HashMap`s.
///
/// Suitable for testing and development environments.
///
/// # Examples
///
/// ```
/// use oauthsig_auth::verify::{SecretProvider, StaticSecretProvider};
///
/// let provider = StaticSecretProvider::new(vec![
///     ("dpf43f3p2l4k3l03".to_owned(), "kd94hf93k423kf44".to_owned()),
/// ])
/// .with_tokens(vec![("nnch734d00sl2jdk".to_owned(), "pfkkdhi9sl3r4s00".to_owned())]);
///
/// assert_eq!(provider.consumer_secret("dpf43f3p2l4k3l03").unwrap(), "kd94hf93k423kf44");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    consumers: HashMap<String, String>,
    tokens: HashMap<String, String>,
}

impl StaticSecretProvider {
    /// Create a provider from (consumer_key, consumer_secret) pairs.
    pub fn new(consumers: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            consumers: consumers.into_iter().collect(),
            tokens: HashMap::new(),
        }
    }

    /// Add (token, token_secret) pairs.
    #[must_use]
    pub fn with_tokens(mut self, tokens: impl IntoIterator<Item = (String, String)>) -> Self {
        self.tokens.extend(tokens);
        self
    }
}

impl SecretProvider for StaticSecretProvider {
    fn consumer_secret(&self, consumer_key: &str) -> Result<String, AuthError> {
        self.consumers
            .get(consumer_key)
            .cloned()
            .ok_or_else(|| AuthError::ConsumerKeyNotFound(consumer_key.to_owned()))
    }

    fn token_secret(&self, _consumer_key: &str, token: &str) -> Result<String, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::TokenNotFound(token.to_owned()))
    }
}

/// Verification policy.
#[derive(Debug, Clone, Copy)]
pub struct VerifyOptions {
    /// Maximum distance between `oauth_timestamp` and now. `None` disables the
    /// check.
    pub max_skew: Option<TimeDelta>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            max_skew: Some(TimeDelta::minutes(5)),
        }
    }
}

/// Where the protocol parameters of a request were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// The `Authorization` header.
    Header,
    /// The form-encoded body.
    Body,
    /// The query string.
    Query,
}

/// The result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// The consumer that signed the request.
    pub consumer_key: String,
    /// The token the request was made with, if any.
    pub token: Option<String>,
    /// The signature method used.
    pub signature_method: SignatureMethod,
    /// `oauth_nonce`, for the caller's replay bookkeeping.
    pub nonce: Option<String>,
    /// `oauth_timestamp` in Unix seconds.
    pub timestamp: Option<i64>,
    /// Where the protocol parameters were carried.
    pub source: ParameterSource,
}

/// Verify an OAuth 1.0 signed request against the current time.
///
/// # Errors
///
/// See [`verify_at`].
pub fn verify(
    request: &RequestDescriptor,
    provider: &dyn SecretProvider,
    options: &VerifyOptions,
) -> Result<VerifiedRequest, AuthError> {
    verify_at(request, provider, options, Utc::now().timestamp())
}

/// Verify an OAuth 1.0 signed request as of Unix time `now`.
///
/// # Errors
///
/// Returns an [`AuthError`] if:
/// - No protocol parameters are present or the header is malformed
/// - `oauth_version` is not `1.0` or a required parameter is missing
/// - The timestamp is outside `options.max_skew`
/// - The consumer key or token is unknown
/// - The signature method cannot be verified (RSA-SHA1)
/// - The signature does not match
pub fn verify_at(
    request: &RequestDescriptor,
    provider: &dyn SecretProvider,
    options: &VerifyOptions,
    now: i64,
) -> Result<VerifiedRequest, AuthError> {
    let query_params = request.query_params()?;
    let (oauth_params, source) = locate_params(request, &query_params)?;

    if let Some(version) = oauth_params.get(OAUTH_VERSION) {
        if version != VERSION_1_0 {
            return Err(AuthError::UnsupportedVersion(version.to_owned()));
        }
    }

    let consumer_key = oauth_params.require(OAUTH_CONSUMER_KEY)?;
    let method_name = oauth_params.require(OAUTH_SIGNATURE_METHOD)?;
    let provided_signature = oauth_params.require(OAUTH_SIGNATURE)?;
    let signature_method: SignatureMethod = method_name
        .parse()
        .map_err(|_| AuthError::UnsupportedSignatureMethod(method_name.to_owned()))?;

    debug!(
        consumer_key = %consumer_key,
        signature_method = %signature_method,
        source = ?source,
        "Verifying OAuth signature"
    );

    let timestamp = match oauth_params.get(OAUTH_TIMESTAMP) {
        Some(ts) => Some(ts.parse::<i64>().map_err(|_| {
            AuthError::MissingParameter(format!("{OAUTH_TIMESTAMP} (invalid integer)"))
        })?),
        None => None,
    };
    let nonce = oauth_params.get(OAUTH_NONCE).map(ToOwned::to_owned);

    if signature_method != SignatureMethod::Plaintext {
        if timestamp.is_none() {
            return Err(AuthError::MissingParameter(OAUTH_TIMESTAMP.to_owned()));
        }
        if nonce.is_none() {
            return Err(AuthError::MissingParameter(OAUTH_NONCE.to_owned()));
        }
    }

    if let (Some(timestamp), Some(max_skew)) = (timestamp, options.max_skew) {
        check_skew(timestamp, now, max_skew)?;
    }

    let strategy = match signature_method {
        SignatureMethod::HmacSha1 => SigningStrategy::HmacSha1,
        SignatureMethod::Plaintext => SigningStrategy::Plaintext,
        SignatureMethod::RsaSha1 => {
            return Err(AuthError::UnsupportedSignatureMethod(format!(
                "{signature_method} verification is not supported"
            )));
        }
    };

    let consumer_secret = provider.consumer_secret(consumer_key)?;
    let token = oauth_params.get(OAUTH_TOKEN).filter(|t| !t.is_empty());
    let credentials = match token {
        Some(token) => Credentials::new(consumer_key, consumer_secret)
            .with_token(token, provider.token_secret(consumer_key, token)?),
        None => Credentials::new(consumer_key, consumer_secret),
    };

    // Only header parameters are passed separately; body and query
    // parameters already contain the protocol parameters.
    let header_params = match source {
        ParameterSource::Header => oauth_params.clone(),
        ParameterSource::Body | ParameterSource::Query => OAuthParams::new(),
    };
    let base_string = if strategy.uses_base_string() {
        build_signature_base_string(
            request.method().as_str(),
            request.url(),
            &header_params,
            &query_params,
            request.body_params(),
        )?
    } else {
        String::new()
    };

    let expected_signature = strategy.sign(&base_string, &credentials)?;

    if provided_signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        debug!(consumer_key = %consumer_key, "OAuth verification succeeded");
        Ok(VerifiedRequest {
            consumer_key: consumer_key.to_owned(),
            token: token.map(ToOwned::to_owned),
            signature_method,
            nonce,
            timestamp,
            source,
        })
    } else {
        debug!(
            consumer_key = %consumer_key,
            signature_method = %signature_method,
            "OAuth signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Find the protocol parameters: header, then form body, then query string.
fn locate_params(
    request: &RequestDescriptor,
    query_params: &[(String, String)],
) -> Result<(OAuthParams, ParameterSource), AuthError> {
    let header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_oauth_header(v));
    if let Some(header) = header {
        return Ok((
            OAuthParams::parse_authorization_header(header)?,
            ParameterSource::Header,
        ));
    }

    if let Some(params) = OAuthParams::from_protocol_pairs(request.body_params())? {
        return Ok((params, ParameterSource::Body));
    }

    if let Some(params) = OAuthParams::from_protocol_pairs(query_params)? {
        return Ok((params, ParameterSource::Query));
    }

    Err(AuthError::MissingAuthorization)
}

/// Reject timestamps further than `max_skew` from `now`, in either direction.
fn check_skew(timestamp: i64, now: i64, max_skew: TimeDelta) -> Result<(), AuthError> {
    let skew = now.abs_diff(timestamp);
    if skew > max_skew.num_seconds().unsigned_abs() {
        debug!(timestamp, now, "OAuth timestamp outside allowed skew");
        return Err(AuthError::RequestExpired);
    }
    Ok(())
}
