//! Portal registration of the published routing services.
//!
//! Only runs against federated servers. The sequence is:
//! 1. Refresh the credential, since staging and upload can outlast it.
//! 2. Find a portal URL whose sharing API answers: the owning-system URL,
//!    else the private portal URL the server reports. If neither answers,
//!    the services stay published and the portal must be configured by hand.
//! 3. Look up the portal items of the services and share them with the
//!    signed-in account.
//! 4. Read back the portal-facing URL of every item and write the utility
//!    service binding into the portal.
//!
//! Step 2 is the only failure that does not end the run.

use crate::error::{PublishError, PublishResult};
use netpub_admin::AdminSession;
use netpub_types::{
    PublishedService, ServerTopology, ServiceEndpoints, ServiceKind, ServiceType,
    UtilityServiceBinding,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Instructions for configuring utility services on a federated server.
pub const FEDERATED_INSTRUCTIONS_URL: &str = "http://esriurl.com/crusffs";
/// Instructions for configuring utility services on a standalone server.
pub const STANDALONE_INSTRUCTIONS_URL: &str = "http://esriurl.com/crusfnfs";

pub fn manual_configuration_message(instructions_url: &str) -> String {
    format!(
        "Please follow the instructions from {instructions_url} to configure the routing services as utility services in your portal using the portal website"
    )
}

/// How the utility-service step of a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationOutcome {
    /// Standalone server; there is no portal to configure.
    NotFederated,
    /// The portal now points at the new services.
    Configured {
        sharing_url: String,
        used_private_url: bool,
    },
    /// No sharing endpoint answered; the portal must be configured by hand.
    ManualConfigurationRequired,
}

pub struct PortalRegistrar<'a> {
    session: &'a mut AdminSession,
    folder: &'a str,
}

impl<'a> PortalRegistrar<'a> {
    pub fn new(session: &'a mut AdminSession, folder: &'a str) -> Self {
        Self { session, folder }
    }

    pub async fn register(
        &mut self,
        services: &[PublishedService],
    ) -> PublishResult<RegistrationOutcome> {
        if !self.session.topology().is_federated() {
            return Ok(RegistrationOutcome::NotFederated);
        }

        self.session.refresh().await?;

        let Some((sharing_url, used_private_url)) = self.sharing_portal().await else {
            warn!(
                "The tool cannot configure the routing services as utility services in your portal. {}",
                manual_configuration_message(FEDERATED_INSTRUCTIONS_URL)
            );
            return Ok(RegistrationOutcome::ManualConfigurationRequired);
        };

        info!("Sharing services with the portal");
        debug!("Making sharing API calls using {sharing_url}");
        let item_ids = self.portal_item_ids(services).await?;
        let ids: Vec<String> = item_ids.values().cloned().collect();
        self.session.share_items_with_account(&sharing_url, &ids).await?;

        let mut urls: BTreeMap<(String, String), String> = BTreeMap::new();
        for key in required_items() {
            let item_id = item_ids
                .get(&key)
                .ok_or_else(|| PublishError::MissingPortalItem(format!("{}.{}", key.0, key.1)))?;
            let url = self.session.portal_item_url(&sharing_url, item_id).await?;
            urls.insert(key, url);
        }

        let endpoint = |kind: ServiceKind, service_type: ServiceType| {
            urls.get(&item_key(kind.service_name(), service_type.as_str()))
                .cloned()
                .unwrap_or_default()
        };
        let endpoints = ServiceEndpoints {
            map_service: endpoint(ServiceKind::Map, ServiceType::MapServer),
            na_server: endpoint(ServiceKind::Map, ServiceType::NaServer),
            main_gp: endpoint(ServiceKind::MainGp, ServiceType::GpServer),
            sync_vrp_gp: endpoint(ServiceKind::SyncVrpGp, ServiceType::GpServer),
            utilities_gp: endpoint(ServiceKind::UtilitiesGp, ServiceType::GpServer),
        };

        info!("Configuring routing services as utility services");
        let binding = UtilityServiceBinding::from_endpoints(&endpoints);
        self.session
            .update_portal_utility_services(&sharing_url, &binding)
            .await?;

        Ok(RegistrationOutcome::Configured {
            sharing_url,
            used_private_url,
        })
    }

    /// The portal URL sharing calls go to, and whether it is the private
    /// one. Switches the session to web-tier topology when it is.
    async fn sharing_portal(&mut self) -> Option<(String, bool)> {
        let portal_url = self.session.topology().portal_url()?.to_string();
        match self.session.probe_sharing(&portal_url).await {
            Ok(()) => return Some((portal_url, false)),
            Err(e) => debug!("Sharing API is not reachable at {portal_url}: {e}"),
        }

        debug!("Determining the private portal url");
        let private_url = match self.session.private_portal_url().await {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!("The server reports no private portal url");
                return None;
            }
            Err(e) => {
                debug!("Failed to read the server security configuration: {e}");
                return None;
            }
        };

        debug!(
            "Checking if the sharing API can be accessed using the private portal URL, {private_url}"
        );
        if let Err(e) = self.session.probe_sharing(&private_url).await {
            debug!("Failed to make sharing API calls with private portal URL: {e}");
            return None;
        }

        debug!("Falling back to the private portal URL {private_url} for sharing API calls");
        self.session.set_topology(ServerTopology::FederatedWebTier {
            portal_url,
            private_portal_url: private_url.clone(),
        });
        Some((private_url, true))
    }

    /// Portal item ids keyed by `(service name, item type)`.
    async fn portal_item_ids(
        &self,
        services: &[PublishedService],
    ) -> PublishResult<BTreeMap<(String, String), String>> {
        let mut ids = BTreeMap::new();
        for service in services {
            let items = self
                .session
                .service_portal_items(self.folder, &service.identity)
                .await?;
            for item in items {
                ids.insert(item_key(&service.identity.name, &item.item_type), item.item_id);
            }
        }
        Ok(ids)
    }
}

fn item_key(name: &str, item_type: &str) -> (String, String) {
    (name.to_string(), item_type.to_string())
}

/// The five portal items the utility binding is composed from.
fn required_items() -> [(String, String); 5] {
    [
        item_key(ServiceKind::Map.service_name(), ServiceType::MapServer.as_str()),
        item_key(ServiceKind::Map.service_name(), ServiceType::NaServer.as_str()),
        item_key(ServiceKind::MainGp.service_name(), ServiceType::GpServer.as_str()),
        item_key(ServiceKind::SyncVrpGp.service_name(), ServiceType::GpServer.as_str()),
        item_key(ServiceKind::UtilitiesGp.service_name(), ServiceType::GpServer.as_str()),
    ]
}
