//! Nonce and timestamp sources.
//!
//! The signer never reads the clock or a random generator on its own; it asks
//! a [`NonceSource`]. [`SystemNonceSource`] is the production implementation,
//! [`StaticNonceSource`] pins both values for reproducible signatures.

/// Supplies a fresh nonce and the current Unix time for each signed request.
///
/// Nonces must be unique with negligible collision probability across every
/// thread and process sharing the same consumer credentials.
pub trait NonceSource: Send + Sync {
    /// A new nonce.
    fn nonce(&self) -> String;

    /// Seconds since the Unix epoch.
    fn timestamp(&self) -> i64;
}

/// Nonces from the operating system CSPRNG (UUID v4), time from the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNonceSource;

impl NonceSource for SystemNonceSource {
    fn nonce(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    fn timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A source that always returns the same nonce and timestamp.
///
/// Suitable for tests and signature fixtures only.
#[derive(Debug, Clone)]
pub struct StaticNonceSource {
    nonce: String,
    timestamp: i64,
}

impl StaticNonceSource {
    /// Create a source pinned to `nonce` and `timestamp`.
    pub fn new(nonce: impl Into<String>, timestamp: i64) -> Self {
        Self {
            nonce: nonce.into(),
            timestamp,
        }
    }
}

impl NonceSource for StaticNonceSource {
    fn nonce(&self) -> String {
        self.nonce.clone()
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
