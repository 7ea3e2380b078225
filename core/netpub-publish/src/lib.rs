//! Publication workflow for network analysis routing services.
//!
//! A run resolves the server topology, provisions the routing folder and
//! data store item, writes the supporting files, drafts, stages, and uploads
//! the four routing services, and registers them with the portal when the
//! server is federated. Every step waits for the previous one.
//!
//! The analysis engine and the packager are external collaborators behind
//! the [`AnalysisEngine`] and [`Packager`] traits.

mod command;

pub mod artifacts;
pub mod builder;
pub mod cleanup;
pub mod config;
pub mod draft;
pub mod engine;
pub mod error;
pub mod packager;
pub mod pipeline;
pub mod provisioner;
pub mod registrar;
pub mod workflow;

pub use artifacts::{CONNECTION_FILE, ConnectionDescriptor, PROJECT_DOCUMENT, ProjectDocument};
pub use builder::{DraftBuilder, DraftContext, MAP_CAPABILITIES};
pub use cleanup::Cleanup;
pub use config::PublishConfig;
pub use draft::{AnalyzerReport, Capability, ServiceDefinitionDraft};
pub use engine::{
    AnalysisArtifact, AnalysisEngine, AnalysisTool, CommandAnalysisEngine, SolverKind, ToolRun,
};
pub use error::{PublishError, PublishResult};
pub use packager::{CommandPackager, DraftRequest, Packager, StageRequest, StagedPackage};
pub use pipeline::{ServiceState, StagingPipeline};
pub use provisioner::ResourceProvisioner;
pub use registrar::{
    FEDERATED_INSTRUCTIONS_URL, PortalRegistrar, RegistrationOutcome,
    STANDALONE_INSTRUCTIONS_URL, manual_configuration_message,
};
pub use workflow::{PublishReport, PublishRequest, RoutingServicePublisher, create_supporting_files};
