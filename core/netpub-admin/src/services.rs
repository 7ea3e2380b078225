//! Service folder and service inspection on the admin API.

use crate::client::ensure_success;
use crate::error::{AdminError, AdminResult};
use crate::session::AdminSession;
use netpub_types::{ServiceFolder, ServiceIdentity, ServiceType};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// A portal item backing a service on a federated server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalItemRef {
    #[serde(rename = "itemID")]
    pub item_id: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderEntry {
    service_name: String,
    #[serde(rename = "type")]
    service_type: String,
}

impl AdminSession {
    /// Names of every service folder on the server.
    pub async fn list_service_folders(&self) -> AdminResult<Vec<String>> {
        let url = self.admin_url("services");
        let root = self.get(&url, &[]).await?;
        Ok(root
            .get("folders")
            .and_then(Value::as_array)
            .map(|folders| {
                folders
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Finds a folder by name, ignoring case, and lists the services it
    /// holds. Services of types the publisher never creates are skipped.
    pub async fn find_service_folder(&self, name: &str) -> AdminResult<Option<ServiceFolder>> {
        let existing = self
            .list_service_folders()
            .await?
            .into_iter()
            .find(|folder| folder.eq_ignore_ascii_case(name));
        let Some(existing) = existing else {
            return Ok(None);
        };

        let url = self.admin_url(&format!("services/{existing}"));
        let listing = self.get(&url, &[]).await?;
        let description = listing
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let mut folder = ServiceFolder::new(existing.clone(), description);

        let entries: Vec<FolderEntry> = match listing.get("services") {
            Some(services) => serde_json::from_value(services.clone())
                .map_err(|e| AdminError::invalid_response(&url, e.to_string()))?,
            None => Vec::new(),
        };
        for entry in entries {
            match entry.service_type.parse::<ServiceType>() {
                Ok(service_type) => {
                    folder
                        .services
                        .insert(ServiceIdentity::new(entry.service_name, service_type));
                }
                Err(_) => debug!(
                    "Skipping {}.{} in {existing}",
                    entry.service_name, entry.service_type
                ),
            }
        }
        Ok(Some(folder))
    }

    /// Creates a service folder.
    pub async fn create_service_folder(&self, name: &str, description: &str) -> AdminResult<()> {
        let url = self.admin_url("services/createFolder");
        let response = self
            .post(&url, &[("folderName", name), ("description", description)])
            .await?;
        ensure_success(&url, &response)
    }

    /// The portal items that back a published service.
    pub async fn service_portal_items(
        &self,
        folder: &str,
        identity: &ServiceIdentity,
    ) -> AdminResult<Vec<PortalItemRef>> {
        let url = self.admin_url(&format!("services/{folder}/{identity}"));
        let properties = self.get(&url, &[]).await?;
        let items = properties
            .pointer("/portalProperties/portalItems")
            .cloned()
            .unwrap_or(Value::Array(Vec::new()));
        serde_json::from_value(items).map_err(|e| AdminError::invalid_response(&url, e.to_string()))
    }

    /// The private portal URL from the server's security configuration,
    /// present only when the portal uses web-tier authentication.
    pub async fn private_portal_url(&self) -> AdminResult<Option<String>> {
        let url = self.admin_url("security/config");
        let config = self.get(&url, &[]).await?;
        Ok(config
            .pointer("/portalProperties/privatePortalUrl")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string))
    }
}
