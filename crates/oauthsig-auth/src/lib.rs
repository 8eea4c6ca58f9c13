//! OAuth 1.0 request signing and signature verification for OAuthSig.
//!
//! This crate signs outgoing HTTP requests per RFC 5849 with HMAC-SHA1,
//! RSA-SHA1 (through an injected private-key signer), or PLAINTEXT, and
//! verifies incoming signed requests on the service provider side.
//!
//! # Overview
//!
//! A signature covers a canonical rendering of the request, the signature base
//! string, built deterministically from the HTTP method, the base string URI,
//! and the sorted, encoded request parameters. The signer and the verifier
//! must agree on it byte for byte.
//!
//! # Usage
//!
//! ```rust
//! use http::Method;
//! use oauthsig_auth::{RequestDescriptor, RequestSigner, SystemNonceSource};
//! use oauthsig_core::{Credentials, SignatureMethod};
//!
//! let signer = RequestSigner::new(
//!     Credentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
//!         .with_token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00"),
//! );
//!
//! let mut request = RequestDescriptor::new(Method::POST, "https://photos.example.net/photos")
//!     .with_form_param("title", "vacation");
//! signer
//!     .sign_with(&mut request, SignatureMethod::HmacSha1, &SystemNonceSource)
//!     .unwrap();
//!
//! assert!(request.headers().contains_key(http::header::AUTHORIZATION));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - URL canonicalization, parameter normalization, base string
//! - [`encoding`] - OAuth percent-encoding and form decoding
//! - [`error`] - Authentication error types
//! - [`nonce`] - Nonce and timestamp sources
//! - [`params`] - The protocol parameter set and its serializations
//! - [`request`] - The request descriptor that is signed
//! - [`signature`] - HMAC-SHA1, RSA-SHA1, and PLAINTEXT
//! - [`signer`] - Request signing orchestration
//! - [`verify`] - Signature verification

pub mod canonical;
pub mod encoding;
pub mod error;
pub mod nonce;
pub mod params;
pub mod request;
pub mod signature;
pub mod signer;
pub mod verify;

pub use canonical::{build_signature_base_string, canonicalize_url, normalize_parameters};
pub use error::AuthError;
pub use nonce::{NonceSource, StaticNonceSource, SystemNonceSource};
pub use params::OAuthParams;
pub use request::RequestDescriptor;
pub use signature::{RsaSigner, RsaSignerError, SigningStrategy};
pub use signer::{Attachment, RequestSigner};
pub use verify::{SecretProvider, StaticSecretProvider, VerifiedRequest, VerifyOptions, verify};
