//! Service identities, folders, data store items, and published services.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The server-side type of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "MapServer")]
    MapServer,
    #[serde(rename = "GPServer")]
    GpServer,
    /// The network analysis extension exposed beneath a map service.
    #[serde(rename = "NAServer")]
    NaServer,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MapServer => "MapServer",
            Self::GpServer => "GPServer",
            Self::NaServer => "NAServer",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MapServer" => Ok(Self::MapServer),
            "GPServer" => Ok(Self::GpServer),
            "NAServer" => Ok(Self::NaServer),
            other => Err(Error::UnknownServiceType(other.to_string())),
        }
    }
}

/// A service as the server names it: `name.Type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceIdentity {
    pub name: String,
    pub service_type: ServiceType,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, service_type: ServiceType) -> Self {
        Self {
            name: name.into(),
            service_type,
        }
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.service_type)
    }
}

impl FromStr for ServiceIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, service_type) = s
            .rsplit_once('.')
            .ok_or_else(|| Error::InvalidServiceIdentity(s.to_string()))?;
        if name.is_empty() {
            return Err(Error::InvalidServiceIdentity(s.to_string()));
        }
        Ok(Self::new(name, service_type.parse()?))
    }
}

/// Whether a geoprocessing service runs jobs or answers in-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    Synchronous,
    Asynchronous,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synchronous => "Synchronous",
            Self::Asynchronous => "Asynchronous",
        }
    }
}

/// The four services published for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Map service with the network analysis extension.
    Map,
    /// Travel modes and tool info.
    UtilitiesGp,
    /// Asynchronous route, closest facility, service area, location-allocation, VRP.
    MainGp,
    /// Synchronous VRP edits.
    SyncVrpGp,
}

impl ServiceKind {
    /// Staging and upload order. Later steps need every URL resolved.
    pub const PUBLISH_ORDER: [ServiceKind; 4] = [
        ServiceKind::Map,
        ServiceKind::UtilitiesGp,
        ServiceKind::MainGp,
        ServiceKind::SyncVrpGp,
    ];

    pub fn service_name(&self) -> &'static str {
        match self {
            Self::Map | Self::MainGp => "NetworkAnalysis",
            Self::UtilitiesGp => "NetworkAnalysisUtilities",
            Self::SyncVrpGp => "NetworkAnalysisSync",
        }
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::Map => ServiceType::MapServer,
            Self::UtilitiesGp | Self::MainGp | Self::SyncVrpGp => ServiceType::GpServer,
        }
    }

    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(self.service_name(), self.service_type())
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        match self {
            Self::MainGp => ExecutionMode::Asynchronous,
            Self::Map | Self::UtilitiesGp | Self::SyncVrpGp => ExecutionMode::Synchronous,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Map => {
                "Supports visualizing historical traffic and performs route, closest facility and service area network analysis in synchronous execution mode."
            }
            Self::UtilitiesGp => {
                "Contains tools that provide auxiliary information for working with network analysis services available with your portal"
            }
            Self::MainGp => {
                "Performs route, closest facility, service area, location-allocation, and vehicle routing problem analyses in asynchronous execution mode."
            }
            Self::SyncVrpGp => {
                "Performs vehicle routing problem analysis in synchronous execution mode."
            }
        }
    }

    pub fn tags(&self) -> &'static str {
        match self {
            Self::Map => "route, closest facility, service area, traffic",
            Self::UtilitiesGp => "travel modes, tool info, network description",
            Self::MainGp => {
                "route, closest facility, service area, location-allocation, vehicle routing problem, vrp"
            }
            Self::SyncVrpGp => "vehicle routing problem, vrp",
        }
    }

    /// File stem for the draft and staged package of this service.
    pub fn file_stem(&self) -> String {
        match self {
            Self::Map => format!("{}_NAServer", self.service_name()),
            _ => format!("{}_GPServer", self.service_name()),
        }
    }

    /// A readable name for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Map => "network analysis map service",
            Self::UtilitiesGp => "network analysis utilities geoprocessing service",
            Self::MainGp => "network analysis geoprocessing service",
            Self::SyncVrpGp => "network analysis sync geoprocessing service",
        }
    }
}

/// A service folder on the server and the services it already holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFolder {
    pub name: String,
    pub description: String,
    pub services: BTreeSet<ServiceIdentity>,
}

impl ServiceFolder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            services: BTreeSet::new(),
        }
    }

    pub fn contains(&self, identity: &ServiceIdentity) -> bool {
        self.services.contains(identity)
    }

    /// The routing services that would be overwritten by a publish.
    pub fn conflicts(&self) -> Vec<ServiceIdentity> {
        let mut conflicts: Vec<ServiceIdentity> = ServiceKind::PUBLISH_ORDER
            .iter()
            .map(ServiceKind::identity)
            .filter(|identity| self.contains(identity))
            .collect();
        conflicts.dedup();
        conflicts
    }
}

/// A folder registered in the server's data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStoreItem {
    pub name: String,
    /// The folder as the server sees it.
    pub server_path: String,
    /// The same folder as the publishing machine sees it.
    pub client_path: String,
}

impl DataStoreItem {
    pub const PARENT_PATH: &'static str = "/fileShares";

    pub fn new(
        name: impl Into<String>,
        server_path: impl Into<String>,
        client_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            server_path: server_path.into(),
            client_path: client_path.into(),
        }
    }

    /// The item path used by the data store REST endpoints.
    pub fn item_path(&self) -> String {
        format!("{}/{}", Self::PARENT_PATH, self.name)
    }

    /// Returns true if `path` names this item, ignoring case.
    pub fn matches_path(&self, path: &str) -> bool {
        path.rsplit('/')
            .next()
            .is_some_and(|name| name.eq_ignore_ascii_case(&self.name))
    }
}

/// A service that is live on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedService {
    pub kind: ServiceKind,
    pub identity: ServiceIdentity,
    /// Server-direct REST URL.
    pub url: String,
}
