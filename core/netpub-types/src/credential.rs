//! The admin credential attached to admin and sharing requests.

use chrono::{DateTime, Utc};
use std::fmt;

/// A token issued either by the server's token endpoint or by the portal
/// the caller is signed into.
///
/// A credential is never edited: when it expires the session replaces it
/// with a freshly issued one.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    token: String,
    referer: String,
    expires_at: DateTime<Utc>,
}

impl AdminCredential {
    /// Creates a credential with an absolute expiry.
    pub fn new(
        token: impl Into<String>,
        referer: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            referer: referer.into(),
            expires_at,
        }
    }

    /// Creates a credential whose expiry is given in epoch milliseconds, as
    /// reported by the server's `generateToken` endpoint.
    pub fn from_epoch_millis(
        token: impl Into<String>,
        referer: impl Into<String>,
        expires_millis: i64,
    ) -> Self {
        let expires_at = DateTime::from_timestamp_millis(expires_millis).unwrap_or_default();
        Self::new(token, referer, expires_at)
    }

    /// Creates a credential whose expiry is given in epoch seconds, as
    /// reported for portal sign-in tokens.
    pub fn from_epoch_secs(
        token: impl Into<String>,
        referer: impl Into<String>,
        expires_secs: i64,
    ) -> Self {
        let expires_at = DateTime::from_timestamp(expires_secs, 0).unwrap_or_default();
        Self::new(token, referer, expires_at)
    }

    /// The opaque token value.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The referer the token was issued for. Sent as the `Referer` header.
    pub fn referer(&self) -> &str {
        &self.referer
    }

    /// When the token stops being accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Query parameters every admin and sharing request carries.
    pub fn query_pairs(&self) -> [(&'static str, &str); 2] {
        [("token", self.token.as_str()), ("f", "json")]
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("token", &"********")
            .field("referer", &self.referer)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A password that never shows up in logs.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The clear-text value, for the token request only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("\"\"")
        } else {
            f.write_str("\"********\"")
        }
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}
