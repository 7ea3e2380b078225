//! Core type definitions for publishing network analysis services.
//!
//! This crate defines the data model shared by every stage of the
//! publication workflow:
//! - The admin credential and the resolved server topology
//! - Service identities, data store items, and published services
//! - The utility-service binding written to a portal
//! - The typed network dataset schema reported by the analysis engine
//!
//! Nothing here performs I/O.

mod binding;
mod credential;
mod schema;
mod service;
mod topology;

pub use binding::{ServiceEndpoints, UtilityRole, UtilityServiceBinding};
pub use credential::{AdminCredential, Password};
pub use schema::{
    AttributeParameter, Extent, NetworkAttribute, NetworkDatasetDescription, NetworkType,
    TIME_UNITS, TrafficInfo, UsageType,
};
pub use service::{
    DataStoreItem, ExecutionMode, PublishedService, ServiceFolder, ServiceIdentity, ServiceKind,
    ServiceType,
};
pub use topology::ServerTopology;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid service identity: {0}")]
    InvalidServiceIdentity(String),

    #[error("unknown service type: {0}")]
    UnknownServiceType(String),
}

/// Broad classes of failure a publish run can end with.
///
/// Every crate error maps onto one of these so the command line can report
/// a stable category regardless of which stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad server URL or missing web adaptor.
    Configuration,
    /// Invalid credentials, missing portal session, untrusted certificate.
    Authentication,
    /// Service or data store name collision.
    Precondition,
    /// Non-success status from an admin or sharing call.
    RemoteOperation,
    /// Network or TLS failure reaching an endpoint.
    Transport,
    /// Local filesystem, serialization, or collaborator failure.
    Local,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Configuration => "ConfigurationError",
            Self::Authentication => "AuthenticationError",
            Self::Precondition => "PreconditionError",
            Self::RemoteOperation => "RemoteOperationError",
            Self::Transport => "TransportError",
            Self::Local => "LocalError",
        };
        f.write_str(name)
    }
}
