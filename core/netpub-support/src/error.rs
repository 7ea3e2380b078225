//! Error types for supporting file generation.

use netpub_types::ErrorCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for supporting file operations.
pub type SupportResult<T> = Result<T, SupportError>;

#[derive(Debug, Error)]
pub enum SupportError {
    #[error("no network datasets were given")]
    NoDatasets,

    #[error("network dataset {dataset} has no {kind} based cost attribute")]
    MissingCostAttribute { dataset: String, kind: &'static str },

    #[error("network dataset {0} does not define any travel modes")]
    NoTravelModes(String),

    #[error("invalid service limit '{0}', expected 'Tool Limit Value'")]
    InvalidServiceLimit(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SupportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoDatasets | Self::InvalidServiceLimit(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Local,
        }
    }
}
