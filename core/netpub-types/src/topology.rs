//! How the target server authenticates administrators.

use crate::credential::Password;

/// The resolved topology of the target server. Fixed for the whole run once
/// the resolver has produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerTopology {
    /// Server manages its own users; tokens come from `admin/generateToken`.
    Standalone { username: String, password: Password },
    /// Federated with a portal whose sharing API is reachable at the
    /// owning-system URL.
    FederatedBuiltin { portal_url: String },
    /// Federated with a portal behind web-tier authentication; the sharing
    /// API is only reachable through the private portal URL.
    FederatedWebTier {
        portal_url: String,
        private_portal_url: String,
    },
}

impl ServerTopology {
    /// Returns true for either federated variant.
    pub fn is_federated(&self) -> bool {
        !matches!(self, Self::Standalone { .. })
    }

    /// The owning-system URL of a federated server.
    pub fn portal_url(&self) -> Option<&str> {
        match self {
            Self::Standalone { .. } => None,
            Self::FederatedBuiltin { portal_url } | Self::FederatedWebTier { portal_url, .. } => {
                Some(portal_url)
            }
        }
    }

    /// The portal URL sharing calls must go to.
    pub fn sharing_portal_url(&self) -> Option<&str> {
        match self {
            Self::Standalone { .. } => None,
            Self::FederatedBuiltin { portal_url } => Some(portal_url),
            Self::FederatedWebTier {
                private_portal_url, ..
            } => Some(private_portal_url),
        }
    }

    /// A short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standalone { .. } => "standalone",
            Self::FederatedBuiltin { .. } => "federated (built-in)",
            Self::FederatedWebTier { .. } => "federated (web-tier)",
        }
    }
}
