//! Calls against a portal's sharing API, made with the admin credential.

use crate::error::{AdminError, AdminResult};
use crate::session::AdminSession;
use netpub_types::UtilityServiceBinding;
use serde_json::Value;
use tracing::debug;

fn sharing_url(portal_url: &str, path: &str) -> String {
    format!(
        "{}/sharing/rest/{}",
        portal_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl AdminSession {
    /// Checks that the sharing API answers at `portal_url`.
    pub async fn probe_sharing(&self, portal_url: &str) -> AdminResult<()> {
        let url = sharing_url(portal_url, "");
        self.get(&url, &[]).await.map(|_| ())
    }

    /// Shares items with the signed-in account, never publicly.
    pub async fn share_items_with_account(
        &self,
        portal_url: &str,
        item_ids: &[String],
    ) -> AdminResult<()> {
        let user = urlencoding::encode(self.username()).into_owned();
        let url = sharing_url(portal_url, &format!("content/users/{user}/shareItems"));
        let items = item_ids.join(",");
        let response = self
            .post(
                &url,
                &[("items", items.as_str()), ("everyone", "false"), ("account", "true")],
            )
            .await?;

        let failed: Vec<&str> = response
            .get("results")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|result| result.get("success").and_then(Value::as_bool) == Some(false))
            .filter_map(|result| result.get("itemId").and_then(Value::as_str))
            .collect();
        if !failed.is_empty() {
            return Err(AdminError::Remote {
                endpoint: url,
                status: "error".to_string(),
                code: None,
                message: format!("failed to share {}", failed.join(", ")),
            });
        }
        debug!("Shared {} item(s) with the signed-in account", item_ids.len());
        Ok(())
    }

    /// The portal-facing URL of an item.
    pub async fn portal_item_url(&self, portal_url: &str, item_id: &str) -> AdminResult<String> {
        let user = urlencoding::encode(self.username()).into_owned();
        let url = sharing_url(portal_url, &format!("content/users/{user}/items/{item_id}"));
        let response = self.get(&url, &[]).await?;
        response
            .pointer("/item/url")
            .and_then(Value::as_str)
            .filter(|item_url| !item_url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AdminError::invalid_response(&url, format!("item {item_id} has no url")))
    }

    /// Writes the utility-service binding into the portal's self resource.
    pub async fn update_portal_utility_services(
        &self,
        portal_url: &str,
        binding: &UtilityServiceBinding,
    ) -> AdminResult<()> {
        let url = sharing_url(portal_url, "portals/self/update");
        let params = binding.to_portal_params();
        let params: Vec<(&str, &str)> = params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        self.post(&url, &params).await.map(|_| ())
    }
}
