//! An authenticated admin session against one server.

use crate::client::AdminClient;
use crate::error::{AdminError, AdminResult};
use crate::host::HostSession;
use netpub_types::{AdminCredential, Password, ServerTopology};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the publishing stages need to talk to the server: the
/// normalized URL, the resolved topology, and a live credential.
pub struct AdminSession {
    client: AdminClient,
    server_url: String,
    topology: ServerTopology,
    credential: AdminCredential,
    username: String,
    host: Arc<dyn HostSession>,
}

impl AdminSession {
    pub(crate) fn new(
        client: AdminClient,
        server_url: String,
        topology: ServerTopology,
        credential: AdminCredential,
        username: String,
        host: Arc<dyn HostSession>,
    ) -> Self {
        Self {
            client,
            server_url,
            topology,
            credential,
            username,
            host,
        }
    }

    /// `scheme://host[:port]/webadaptor`
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn topology(&self) -> &ServerTopology {
        &self.topology
    }

    /// Replaces the topology. Only the registrar does this, when it learns
    /// that the portal sits behind web-tier authentication.
    pub fn set_topology(&mut self, topology: ServerTopology) {
        self.topology = topology;
    }

    pub fn credential(&self) -> &AdminCredential {
        &self.credential
    }

    /// The signed-in user, as reported by the admin info endpoint.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    /// `{server}/admin/{path}`
    pub fn admin_url(&self, path: &str) -> String {
        format!("{}/admin/{}", self.server_url, path.trim_start_matches('/'))
    }

    /// `{server}/rest/services/{path}`
    pub fn rest_services_url(&self, path: &str) -> String {
        format!(
            "{}/rest/services/{}",
            self.server_url,
            path.trim_start_matches('/')
        )
    }

    /// Authenticated GET.
    pub async fn get(&self, url: &str, params: &[(&str, &str)]) -> AdminResult<Value> {
        self.client.get_json(url, &self.credential, params).await
    }

    /// Authenticated form POST.
    pub async fn post(&self, url: &str, params: &[(&str, &str)]) -> AdminResult<Value> {
        self.client.post_form(url, &self.credential, params).await
    }

    /// Authenticated form POST without the body status check.
    pub async fn post_unchecked(&self, url: &str, params: &[(&str, &str)]) -> AdminResult<Value> {
        self.client
            .post_form_unchecked(url, Some(&self.credential), params)
            .await
    }

    /// Replaces the credential with a freshly issued one.
    pub async fn refresh(&mut self) -> AdminResult<()> {
        self.credential = match &self.topology {
            ServerTopology::Standalone { username, password } => {
                generate_server_token(&self.client, &self.server_url, username, password).await?
            }
            topology => {
                let portal = topology.portal_url().unwrap_or_default().to_string();
                self.host
                    .signin_token()
                    .await
                    .filter(|token| !token.token.is_empty())
                    .ok_or(AdminError::NotSignedIntoPortal(portal))?
                    .into_credential()
            }
        };
        debug!("Refreshed admin token, expires {}", self.credential.expires_at());
        Ok(())
    }

    /// Refreshes the credential if it has expired.
    pub async fn ensure_fresh(&mut self) -> AdminResult<()> {
        if self.credential.is_expired() {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Checks that the credential grants administrator privilege and
    /// records the signed-in user name.
    pub async fn verify_admin_access(&mut self) -> AdminResult<()> {
        let url = self.admin_url("info");
        let info = match self.get(&url, &[]).await {
            Ok(info) => info,
            Err(e) if e.is_forbidden() => {
                return Err(AdminError::AdminAccessDisabled(self.server_url.clone()));
            }
            Err(e) => return Err(e),
        };

        if let Some(user) = info.get("loggedInUser").and_then(Value::as_str) {
            self.username = user.rsplit("::").next().unwrap_or(user).to_string();
        }
        let privilege = info
            .get("loggedInUserPrivilege")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if privilege != "ADMINISTER" {
            return Err(AdminError::InsufficientPrivilege(self.username.clone()));
        }
        info!("Signed in to {} as {}", self.server_url, self.username);
        Ok(())
    }
}

/// Requests a token from the server's own token endpoint.
pub async fn generate_server_token(
    client: &AdminClient,
    server_url: &str,
    username: &str,
    password: &Password,
) -> AdminResult<AdminCredential> {
    let url = format!("{server_url}/admin/generateToken");
    let params = [
        ("username", username),
        ("password", password.expose()),
        ("client", "referer"),
        ("referer", server_url),
    ];
    let response = client.post_form_unchecked(&url, None, &params).await?;

    let token = response
        .get("token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or(AdminError::InvalidCredentials)?;
    let expires = response.get("expires").and_then(Value::as_i64).unwrap_or(0);
    Ok(AdminCredential::from_epoch_millis(token, server_url, expires))
}
