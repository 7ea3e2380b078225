//! Publish workflow configuration.

use netpub_admin::AdminClientConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Names, collaborator commands, and switches for a publish run.
///
/// Every field has a default, so a configuration file only needs the
/// values it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Server folder the routing services are published into.
    pub folder_name: String,
    pub folder_description: String,
    /// Name of the data store item registered for the network data.
    pub data_store_item_name: String,
    /// Folder, under the output folder, that receives the supporting files.
    pub supporting_folder_name: String,
    /// Log file written into the output folder by the publish command.
    pub log_file_name: String,
    /// Keep intermediate artifacts and write `.xml` copies of drafts.
    pub verbose: bool,
    /// Executable implementing the analysis engine protocol.
    pub engine_command: Option<PathBuf>,
    /// Executable implementing the packaging protocol.
    pub packager_command: Option<PathBuf>,
    /// `Tool Limit Value;...` written into the tool info.
    pub service_limits: Option<String>,
    pub localized_travel_modes_folder: Option<PathBuf>,
    pub admin: AdminClientConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            folder_name: "Routing".to_string(),
            folder_description: "Contains services used to perform network analysis.".to_string(),
            data_store_item_name: "RoutingData".to_string(),
            supporting_folder_name: "NDSupportingFiles".to_string(),
            log_file_name: "PublishRoutingServices.log".to_string(),
            verbose: false,
            engine_command: None,
            packager_command: None,
            service_limits: None,
            localized_travel_modes_folder: None,
            admin: AdminClientConfig::default(),
        }
    }
}
