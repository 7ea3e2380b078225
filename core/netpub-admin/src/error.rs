//! Error types for the admin layer.

use netpub_types::ErrorCategory;
use thiserror::Error;

/// Result type for admin operations.
pub type AdminResult<T> = Result<T, AdminError>;

/// Errors that can occur talking to the server or portal.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Scheme is not http/https or the URL does not parse.
    #[error("{0} is not a valid server URL")]
    InvalidServerUrl(String),

    /// No web adaptor path segment.
    #[error("the server URL, {0}, does not include the web adaptor name")]
    MissingWebAdaptor(String),

    /// The token endpoint issued no token.
    #[error("invalid user name or password")]
    InvalidCredentials,

    /// The host has no portal session for the server's owning system.
    #[error(
        "sign in to portal, {0}, as a user with administrator privilege before publishing to a federated server"
    )]
    NotSignedIntoPortal(String),

    /// TLS verification failed.
    #[error(
        "the SSL certificate presented by {endpoint} is not trusted; import the server certificate into the operating system certificate store"
    )]
    UntrustedCertificate { endpoint: String },

    /// The admin API answered 403.
    #[error("administrative access is disabled at {0}")]
    AdminAccessDisabled(String),

    /// Signed in, but not as an administrator.
    #[error("user {0} does not have administrator privilege")]
    InsufficientPrivilege(String),

    /// Non-2xx HTTP status.
    #[error("{endpoint} returned HTTP {status} {reason}")]
    Http {
        endpoint: String,
        status: u16,
        reason: String,
    },

    /// The body reported a non-success status or an error object.
    #[error("{endpoint} reported status '{status}': {message}")]
    Remote {
        endpoint: String,
        status: String,
        code: Option<i64>,
        message: String,
    },

    /// The body was not the JSON we expected.
    #[error("unexpected response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// Connection, DNS, or TLS failure.
    #[error("failed to reach {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The publishing tools job did not succeed.
    #[error("publishing job {job_id} ended with {status}: {message}")]
    PublishJobFailed {
        job_id: String,
        status: String,
        message: String,
    },

    /// I/O error reading a package.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdminError {
    /// The failure class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidServerUrl(_) | Self::MissingWebAdaptor(_) => ErrorCategory::Configuration,
            Self::InvalidCredentials
            | Self::NotSignedIntoPortal(_)
            | Self::UntrustedCertificate { .. }
            | Self::AdminAccessDisabled(_)
            | Self::InsufficientPrivilege(_) => ErrorCategory::Authentication,
            Self::Http { .. }
            | Self::Remote { .. }
            | Self::InvalidResponse { .. }
            | Self::PublishJobFailed { .. } => ErrorCategory::RemoteOperation,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Local,
        }
    }

    /// Returns true if the server rejected the request as forbidden, either
    /// with an HTTP 403 or with a 403 code inside the body.
    pub fn is_forbidden(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 403,
            Self::Remote { code, .. } => *code == Some(403),
            _ => false,
        }
    }

    pub(crate) fn invalid_response(endpoint: &str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}
