//! Error types for the publish workflow.

use netpub_admin::AdminError;
use netpub_support::SupportError;
use netpub_types::{ErrorCategory, ServiceIdentity};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that end a publish run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("services already exist in folder {folder}: {}", list(.services))]
    ServiceAlreadyExists {
        folder: String,
        services: Vec<ServiceIdentity>,
    },

    #[error("failed to register data store item {item}: status {status}")]
    DataStoreRegistrationFailed { item: String, status: String },

    #[error("network dataset {0} is not stored in a folder that can be registered")]
    InvalidDataset(String),

    #[error("no portal item of type {0} was found for the published services")]
    MissingPortalItem(String),

    #[error("{kind} draft has analyzer errors: {}", .errors.join("; "))]
    AnalyzerErrors { kind: String, errors: Vec<String> },

    #[error("invalid service definition draft {path}: {message}")]
    InvalidDraft { path: PathBuf, message: String },

    #[error("{command} failed: {message}")]
    Collaborator { command: String, message: String },

    #[error("{stage} has not been reached for {kind}")]
    OutOfOrder { kind: String, stage: &'static str },

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Support(#[from] SupportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn list(services: &[ServiceIdentity]) -> String {
    services
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl PublishError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ServiceAlreadyExists { .. } => ErrorCategory::Precondition,
            Self::DataStoreRegistrationFailed { .. } | Self::MissingPortalItem(_) => {
                ErrorCategory::RemoteOperation
            }
            Self::InvalidDataset(_) => ErrorCategory::Configuration,
            Self::Admin(e) => e.category(),
            Self::Support(e) => e.category(),
            Self::AnalyzerErrors { .. }
            | Self::InvalidDraft { .. }
            | Self::Collaborator { .. }
            | Self::OutOfOrder { .. }
            | Self::Io(_)
            | Self::Serialization(_) => ErrorCategory::Local,
        }
    }
}
