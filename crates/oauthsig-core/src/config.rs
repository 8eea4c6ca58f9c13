//! Configuration management for OAuthSig.
//!
//! All configuration is driven by environment variables.

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::{Credentials, HeaderStyle, SignatureMethod};

/// Signing configuration for a single consumer.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConfig {
    /// Consumer key (`oauth_consumer_key`).
    pub consumer_key: String,
    /// Consumer secret. Never serialized.
    #[serde(skip_serializing, default)]
    pub consumer_secret: String,
    /// Token key (`oauth_token`), if a token has been issued.
    pub token: Option<String>,
    /// Token secret. Never serialized.
    #[serde(skip_serializing, default)]
    pub token_secret: Option<String>,
    /// Signature method used when none is requested explicitly.
    pub signature_method: SignatureMethod,
    /// `oauth_callback` value, emitted only when set.
    pub callback: Option<String>,
    /// `realm` emitted at the front of the `Authorization` header.
    pub realm: Option<String>,
    /// Serialization of the `Authorization` header.
    pub header_style: HeaderStyle,
    /// Log level.
    pub log_level: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("consumer_key", &self.consumer_key)
            .field("token", &self.token)
            .field("signature_method", &self.signature_method)
            .field("callback", &self.callback)
            .field("realm", &self.realm)
            .field("header_style", &self.header_style)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            token: None,
            token_secret: None,
            signature_method: SignatureMethod::default(),
            callback: None,
            realm: None,
            header_style: HeaderStyle::default(),
            log_level: "info".to_owned(),
        }
    }
}

impl OAuthConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OAUTH_CONSUMER_KEY` | *(required)* |
    /// | `OAUTH_CONSUMER_SECRET` | *(required)* |
    /// | `OAUTH_TOKEN` | *(unset)* |
    /// | `OAUTH_TOKEN_SECRET` | *(unset)* |
    /// | `OAUTH_SIGNATURE_METHOD` | `HMAC-SHA1` |
    /// | `OAUTH_CALLBACK` | *(unset)* |
    /// | `OAUTH_REALM` | *(unset)* |
    /// | `OAUTH_HEADER_STYLE` | `quoted` |
    /// | `LOG_LEVEL` | `info` |
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();

        config.consumer_key = lookup("OAUTH_CONSUMER_KEY")
            .ok_or_else(|| CoreError::Config("OAUTH_CONSUMER_KEY is not set".to_owned()))?;
        config.consumer_secret = lookup("OAUTH_CONSUMER_SECRET")
            .ok_or_else(|| CoreError::Config("OAUTH_CONSUMER_SECRET is not set".to_owned()))?;

        config.token = lookup("OAUTH_TOKEN").filter(|v| !v.is_empty());
        config.token_secret = lookup("OAUTH_TOKEN_SECRET");
        if config.token.is_none() && config.token_secret.as_deref().is_some_and(|s| !s.is_empty()) {
            return Err(CoreError::Config(
                "OAUTH_TOKEN_SECRET is set without OAUTH_TOKEN".to_owned(),
            ));
        }

        if let Some(v) = lookup("OAUTH_SIGNATURE_METHOD") {
            config.signature_method = v.parse()?;
        }
        if let Some(v) = lookup("OAUTH_CALLBACK") {
            config.callback = Some(v);
        }
        if let Some(v) = lookup("OAUTH_REALM") {
            config.realm = Some(v);
        }
        if let Some(v) = lookup("OAUTH_HEADER_STYLE") {
            config.header_style = v.parse()?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        debug!(
            consumer_key = %config.consumer_key,
            signature_method = %config.signature_method,
            has_token = config.token.is_some(),
            "loaded OAuth configuration"
        );

        Ok(config)
    }

    /// Build the signing [`Credentials`] described by this configuration.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(&self.consumer_key, &self.consumer_secret);
        match &self.token {
            Some(token) => {
                credentials.with_token(token, self.token_secret.as_deref().unwrap_or_default())
            }
            None => credentials,
        }
    }
}
