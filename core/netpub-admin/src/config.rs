//! Admin client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the HTTP clients used against the server and portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminClientConfig {
    /// Accept self-signed certificates on admin and sharing calls. Admin
    /// access is usually only enabled on ports with self-signed
    /// certificates. The public info probe always verifies.
    pub accept_invalid_admin_certs: bool,
    /// Overall request timeout. `None` leaves it to the transport.
    pub request_timeout_secs: Option<u64>,
    /// Delay between publishing job status polls (milliseconds).
    pub job_poll_interval_ms: u64,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for AdminClientConfig {
    fn default() -> Self {
        Self {
            accept_invalid_admin_certs: true,
            request_timeout_secs: None,
            job_poll_interval_ms: 2_000,
            user_agent: format!("netpub/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
