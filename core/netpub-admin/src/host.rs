//! The host application's portal session.
//!
//! Federated servers are administered with the token of whoever is signed
//! into the portal on the publishing machine. The publisher never signs in
//! itself; it asks the host.

use async_trait::async_trait;
use netpub_types::AdminCredential;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// A portal sign-in token as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninToken {
    pub token: String,
    #[serde(default)]
    pub referer: String,
    /// Expiry in epoch seconds.
    #[serde(default)]
    pub expires: i64,
}

impl SigninToken {
    pub fn into_credential(self) -> AdminCredential {
        AdminCredential::from_epoch_secs(self.token, self.referer, self.expires)
    }
}

/// Access to the portal session of the host application.
#[async_trait]
pub trait HostSession: Send + Sync {
    /// The portal the host is currently signed into.
    async fn active_portal_url(&self) -> Option<String>;

    /// The current sign-in token, or `None` when nobody is signed in.
    /// Called again whenever a token expires.
    async fn signin_token(&self) -> Option<SigninToken>;
}

/// A fixed session, for hosts that hand over one token up front.
#[derive(Debug, Clone, Default)]
pub struct StaticHostSession {
    portal_url: Option<String>,
    token: Option<SigninToken>,
}

impl StaticHostSession {
    pub fn new(portal_url: impl Into<String>, token: SigninToken) -> Self {
        Self {
            portal_url: Some(portal_url.into()),
            token: Some(token),
        }
    }

    /// No portal session at all.
    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HostSession for StaticHostSession {
    async fn active_portal_url(&self) -> Option<String> {
        self.portal_url.clone()
    }

    async fn signin_token(&self) -> Option<SigninToken> {
        self.token.clone()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    portal_url: String,
    #[serde(flatten)]
    token: SigninToken,
}

/// A session read from a JSON file on every call, so a host that renews
/// its token by rewriting the file is picked up mid-run.
///
/// The file looks like
/// `{"portalUrl": "...", "token": "...", "referer": "...", "expires": 0}`.
#[derive(Debug, Clone)]
pub struct FileHostSession {
    path: PathBuf,
}

impl FileHostSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Option<SessionFile> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("No host session at {}: {e}", self.path.display());
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Unreadable host session at {}: {e}", self.path.display());
                None
            }
        }
    }
}

#[async_trait]
impl HostSession for FileHostSession {
    async fn active_portal_url(&self) -> Option<String> {
        self.read().await.map(|session| session.portal_url)
    }

    async fn signin_token(&self) -> Option<SigninToken> {
        self.read()
            .await
            .map(|session| session.token)
            .filter(|token| !token.token.is_empty())
    }
}
