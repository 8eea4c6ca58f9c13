//! End-to-end tests for OAuthSig.
//!
//! Requests are signed with `oauthsig-auth`, turned into `http` request
//! parts as a server would receive them, and verified again. Nothing here
//! needs network access.
//!
//! ```text
//! cargo test -p oauthsig-integration
//! ```

use std::sync::Once;

use http::header::AUTHORIZATION;
use oauthsig_auth::{RequestDescriptor, RequestSigner, StaticSecretProvider};
use oauthsig_core::Credentials;

static INIT: Once = Once::new();

/// Consumer key from the RFC 5849 examples.
pub const CONSUMER_KEY: &str = "dpf43f3p2l4k3l03";
/// Consumer secret from the RFC 5849 examples.
pub const CONSUMER_SECRET: &str = "kd94hf93k423kf44";
/// Token from the RFC 5849 examples.
pub const TOKEN: &str = "nnch734d00sl2jdk";
/// Token secret from the RFC 5849 examples.
pub const TOKEN_SECRET: &str = "pfkkdhi9sl3r4s00";

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A signer holding the example consumer and token.
#[must_use]
pub fn signer() -> RequestSigner {
    init_tracing();
    RequestSigner::new(
        Credentials::new(CONSUMER_KEY, CONSUMER_SECRET).with_token(TOKEN, TOKEN_SECRET),
    )
}

/// A secret store that knows the example consumer and token.
#[must_use]
pub fn provider() -> StaticSecretProvider {
    StaticSecretProvider::new([(CONSUMER_KEY.to_owned(), CONSUMER_SECRET.to_owned())])
        .with_tokens([(TOKEN.to_owned(), TOKEN_SECRET.to_owned())])
}

/// Render a signed descriptor as the request parts and body a server sees.
///
/// # Panics
///
/// Panics if the descriptor does not form a valid `http` request.
#[must_use]
pub fn to_http_parts(request: &RequestDescriptor) -> (http::request::Parts, Vec<u8>) {
    let mut builder = http::Request::builder()
        .method(request.method().clone())
        .uri(request.url());
    for (name, value) in request.headers() {
        builder = builder.header(name, value);
    }
    let body = request.form_body().into_bytes();
    let (parts, ()) = builder.body(()).expect("valid request").into_parts();
    (parts, body)
}

/// The `Authorization` header of a request as a string, if present.
#[must_use]
pub fn authorization(request: &RequestDescriptor) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

mod test_canonical;
mod test_sign;
mod test_verify;
