//! Admin and sharing REST client for network analysis publication.
//!
//! This crate provides:
//! - [`TopologyResolver`]: URL normalization, federation detection, and
//!   credential acquisition
//! - [`AdminSession`]: an authenticated session with folder, data store,
//!   upload, and sharing operations
//! - [`HostSession`]: the seam to the host application's portal sign-in
//!
//! All calls are awaited one at a time; nothing here runs requests
//! concurrently.

pub mod client;
pub mod config;
pub mod data_store;
pub mod error;
pub mod host;
pub mod publishing;
pub mod resolver;
pub mod services;
pub mod session;
pub mod sharing;

pub use client::AdminClient;
pub use config::AdminClientConfig;
pub use error::{AdminError, AdminResult};
pub use host::{FileHostSession, HostSession, SigninToken, StaticHostSession};
pub use publishing::JobStatus;
pub use resolver::{TopologyResolver, normalize_server_url};
pub use services::PortalItemRef;
pub use session::{AdminSession, generate_server_token};
