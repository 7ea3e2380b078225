//! Folder registrations in the server's data store.

use crate::client::ensure_success;
use crate::error::AdminResult;
use crate::session::AdminSession;
use netpub_types::DataStoreItem;
use serde_json::{Value, json};

impl AdminSession {
    /// Paths of every registered folder under `/fileShares`.
    pub async fn find_data_store_folders(&self) -> AdminResult<Vec<String>> {
        let url = self.admin_url("data/findItems");
        let response = self
            .post(
                &url,
                &[("parentPath", DataStoreItem::PARENT_PATH), ("types", "folder")],
            )
            .await?;
        Ok(response
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("path").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Removes a registration by item path.
    pub async fn unregister_data_store_item(&self, item_path: &str) -> AdminResult<()> {
        let url = self.admin_url("data/unregisterItem");
        let response = self.post(&url, &[("itempath", item_path)]).await?;
        ensure_success(&url, &response)
    }

    /// Registers a folder and returns the status the server reported.
    /// Interpreting a non-success status is left to the caller.
    pub async fn register_data_store_item(&self, item: &DataStoreItem) -> AdminResult<String> {
        let url = self.admin_url("data/registerItem");
        let body = registration_body(item).to_string();
        let response = self.post_unchecked(&url, &[("item", body.as_str())]).await?;
        Ok(response
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }
}

/// The `item` document for `registerItem`. When the server and the
/// publishing machine see the same path the folder is shared, otherwise
/// it is replicated from the client path.
pub fn registration_body(item: &DataStoreItem) -> Value {
    let mut info = json!({ "path": item.server_path });
    if item.server_path == item.client_path {
        info["dataStoreConnectionType"] = json!("shared");
    } else {
        info["dataStoreConnectionType"] = json!("replicated");
        info["clientPath"] = json!(item.client_path);
    }
    json!({
        "type": "folder",
        "path": item.item_path(),
        "info": info,
    })
}
