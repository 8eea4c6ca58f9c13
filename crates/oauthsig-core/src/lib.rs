//! Core types, credentials, and configuration for OAuthSig.
//!
//! This crate provides the building blocks shared by the signing pipeline and
//! the command-line tool: the consumer/token [`Credentials`], the closed set of
//! [`SignatureMethod`]s, the `Authorization` header [`HeaderStyle`], and the
//! environment-driven [`OAuthConfig`].

mod config;
mod error;
mod types;

pub use config::OAuthConfig;
pub use error::{CoreError, CoreResult};
pub use types::{Credentials, HeaderStyle, SignatureMethod};
