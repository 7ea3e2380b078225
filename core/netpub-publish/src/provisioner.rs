//! Server-side and local resources a publish needs before packaging.

use crate::config::PublishConfig;
use crate::error::{PublishError, PublishResult};
use netpub_admin::AdminSession;
use netpub_types::DataStoreItem;
use std::path::Path;
use tracing::{debug, error, info};

pub struct ResourceProvisioner<'a> {
    session: &'a AdminSession,
    config: &'a PublishConfig,
}

impl<'a> ResourceProvisioner<'a> {
    pub fn new(session: &'a AdminSession, config: &'a PublishConfig) -> Self {
        Self { session, config }
    }

    /// Creates the routing folder, or reuses it when none of the routing
    /// services exist in it yet.
    pub async fn ensure_service_folder(&self) -> PublishResult<()> {
        let name = &self.config.folder_name;
        match self.session.find_service_folder(name).await? {
            Some(folder) => {
                let conflicts = folder.conflicts();
                if !conflicts.is_empty() {
                    for identity in &conflicts {
                        error!("{identity} service already exists in the {} folder", folder.name);
                    }
                    return Err(PublishError::ServiceAlreadyExists {
                        folder: folder.name,
                        services: conflicts,
                    });
                }
                info!("Using existing service folder {}", folder.name);
            }
            None => {
                info!("Creating service folder {name}");
                self.session
                    .create_service_folder(name, &self.config.folder_description)
                    .await?;
            }
        }
        Ok(())
    }

    /// Replaces any data store item with the same name, ignoring case, by a
    /// fresh registration of `item`.
    pub async fn register_data_store(&self, item: &DataStoreItem) -> PublishResult<()> {
        for path in self.session.find_data_store_folders().await? {
            if item.matches_path(&path) {
                debug!("Removing existing data store item {path}");
                self.session.unregister_data_store_item(&path).await?;
            }
        }

        info!(
            "Registering {} as data store item {}",
            item.server_path, item.name
        );
        let status = self.session.register_data_store_item(item).await?;
        if status != "success" {
            return Err(PublishError::DataStoreRegistrationFailed {
                item: item.name.clone(),
                status,
            });
        }
        Ok(())
    }

    /// Deletes `folder` if present and creates it empty.
    pub fn recreate_supporting_folder(&self, folder: &Path) -> PublishResult<()> {
        if folder.exists() {
            debug!("Removing {}", folder.display());
            std::fs::remove_dir_all(folder)?;
        }
        std::fs::create_dir_all(folder)?;
        Ok(())
    }

    /// Runs all three steps in order.
    pub async fn provision(&self, item: &DataStoreItem, supporting_folder: &Path) -> PublishResult<()> {
        self.ensure_service_folder().await?;
        self.register_data_store(item).await?;
        self.recreate_supporting_folder(supporting_folder)
    }
}
