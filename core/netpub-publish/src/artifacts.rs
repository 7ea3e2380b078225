//! Intermediate documents handed to the packaging collaborator.

use crate::engine::AnalysisArtifact;
use crate::error::PublishResult;
use netpub_admin::AdminSession;
use netpub_types::ServerTopology;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONNECTION_FILE: &str = "server.json";
pub const PROJECT_DOCUMENT: &str = "NetworkAnalysis.json";

/// Where and how the packager connects to the server. Never holds a
/// password; federated connections carry no user at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDescriptor {
    pub server_url: String,
    pub folder: String,
    pub topology: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ConnectionDescriptor {
    pub fn for_session(session: &AdminSession, folder: &str) -> Self {
        let username = match session.topology() {
            ServerTopology::Standalone { username, .. } => Some(username.clone()),
            _ => None,
        };
        Self {
            server_url: session.server_url().to_string(),
            folder: folder.to_string(),
            topology: session.topology().label().to_string(),
            username,
        }
    }

    pub fn write(&self, output_folder: &Path) -> PublishResult<PathBuf> {
        write_document(&output_folder.join(CONNECTION_FILE), self)
    }
}

/// The analysis layers a map service is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub network_dataset: PathBuf,
    pub cost_attribute: String,
    pub layers: Vec<AnalysisArtifact>,
}

impl ProjectDocument {
    pub fn write(&self, output_folder: &Path) -> PublishResult<PathBuf> {
        write_document(&output_folder.join(PROJECT_DOCUMENT), self)
    }
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> PublishResult<PathBuf> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    std::fs::write(path, text)?;
    Ok(path.to_path_buf())
}
