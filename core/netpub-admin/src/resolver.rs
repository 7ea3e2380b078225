//! Server URL normalization and topology resolution.

use crate::client::AdminClient;
use crate::error::{AdminError, AdminResult};
use crate::host::HostSession;
use crate::session::{AdminSession, generate_server_token};
use netpub_types::{Password, ServerTopology};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Reduces a server URL to `scheme://host[:port]/webadaptor`.
///
/// Anything after the first path segment is dropped. Fails without any
/// network traffic when the scheme is not http(s) or the web adaptor
/// segment is missing.
pub fn normalize_server_url(raw: &str) -> AdminResult<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| AdminError::InvalidServerUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AdminError::InvalidServerUrl(raw.to_string()));
    }
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| AdminError::InvalidServerUrl(raw.to_string()))?;

    let web_adaptor = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| AdminError::MissingWebAdaptor(raw.to_string()))?;

    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok(format!("{}://{}/{}", url.scheme(), authority, web_adaptor))
}

fn same_portal(a: &str, b: &str) -> bool {
    let normalize = |url: &str| url.trim().trim_end_matches('/').to_ascii_lowercase();
    normalize(a) == normalize(b)
}

/// Works out how the server authenticates and produces a verified session.
pub struct TopologyResolver {
    client: AdminClient,
    host: Arc<dyn HostSession>,
}

impl TopologyResolver {
    pub fn new(client: AdminClient, host: Arc<dyn HostSession>) -> Self {
        Self { client, host }
    }

    /// Resolves the topology of the server at `raw_url` and returns a
    /// session whose credential has been checked for admin privilege.
    ///
    /// Federated servers use the host's portal token; `username` and
    /// `password` are ignored for them with a warning. Standalone servers
    /// get a token from `admin/generateToken`.
    pub async fn resolve(
        &self,
        raw_url: &str,
        username: Option<&str>,
        password: Option<&Password>,
    ) -> AdminResult<AdminSession> {
        let server_url = normalize_server_url(raw_url)?;
        debug!("Normalized server URL: {server_url}");

        let info_url = format!("{server_url}/rest/info");
        let info = self.client.get_public(&info_url).await?;
        let owning_system = info
            .get("owningSystemUrl")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        let (topology, credential, user) = match owning_system {
            Some(portal_url) => {
                info!("{server_url} is federated with {portal_url}");
                let active = self.host.active_portal_url().await;
                if !active.as_deref().is_some_and(|a| same_portal(a, &portal_url)) {
                    return Err(AdminError::NotSignedIntoPortal(portal_url));
                }
                let token = self
                    .host
                    .signin_token()
                    .await
                    .filter(|token| !token.token.is_empty())
                    .ok_or_else(|| AdminError::NotSignedIntoPortal(portal_url.clone()))?;

                if username.is_some_and(|u| !u.is_empty()) {
                    warn!("The user name is ignored when publishing to a federated server");
                }
                if password.is_some_and(|p| !p.is_empty()) {
                    warn!("The password is ignored when publishing to a federated server");
                }

                (
                    ServerTopology::FederatedBuiltin { portal_url },
                    token.into_credential(),
                    username.unwrap_or_default().to_string(),
                )
            }
            None => {
                info!("{server_url} is a stand-alone server");
                let username = username
                    .filter(|u| !u.is_empty())
                    .ok_or(AdminError::InvalidCredentials)?;
                let password = password.cloned().unwrap_or_default();
                let credential =
                    generate_server_token(&self.client, &server_url, username, &password).await?;
                (
                    ServerTopology::Standalone {
                        username: username.to_string(),
                        password,
                    },
                    credential,
                    username.to_string(),
                )
            }
        };

        let mut session = AdminSession::new(
            self.client.clone(),
            server_url,
            topology,
            credential,
            user,
            self.host.clone(),
        );
        session.verify_admin_access().await?;
        Ok(session)
    }
}
