//! The two entry operations: supporting files and the full publish run.

use crate::artifacts::{CONNECTION_FILE, ConnectionDescriptor, PROJECT_DOCUMENT};
use crate::builder::{DraftBuilder, DraftContext};
use crate::cleanup::Cleanup;
use crate::config::PublishConfig;
use crate::engine::AnalysisEngine;
use crate::error::{PublishError, PublishResult};
use crate::packager::Packager;
use crate::pipeline::StagingPipeline;
use crate::provisioner::ResourceProvisioner;
use crate::registrar::{
    PortalRegistrar, RegistrationOutcome, STANDALONE_INSTRUCTIONS_URL,
    manual_configuration_message,
};
use netpub_admin::{AdminClient, HostSession, TopologyResolver};
use netpub_support::{ExportOptions, SupportError, SupportingFiles, SupportingFilesExporter};
use netpub_types::{
    DataStoreItem, NetworkDatasetDescription, Password, PublishedService, ServerTopology,
    ServiceKind,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Inputs of a publish run.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Catalog paths of the network datasets. The first one is the one the
    /// services solve on; every one gets a properties section.
    pub network_datasets: Vec<String>,
    pub server_url: String,
    pub username: Option<String>,
    pub password: Option<Password>,
    /// The data folder as the server sees it.
    pub server_data_folder_path: String,
    pub output_folder: PathBuf,
}

/// What a successful run published.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub topology: ServerTopology,
    pub services: Vec<PublishedService>,
    pub registration: RegistrationOutcome,
}

impl PublishReport {
    pub fn service(&self, kind: ServiceKind) -> Option<&PublishedService> {
        self.services.iter().find(|service| service.kind == kind)
    }
}

/// Describes every dataset with the engine and writes the supporting files.
pub async fn create_supporting_files(
    engine: &dyn AnalysisEngine,
    network_datasets: &[String],
    options: ExportOptions,
) -> PublishResult<SupportingFiles> {
    let datasets = describe_all(engine, network_datasets).await?;
    Ok(SupportingFilesExporter::new(options).export(&datasets)?)
}

async fn describe_all(
    engine: &dyn AnalysisEngine,
    network_datasets: &[String],
) -> PublishResult<Vec<NetworkDatasetDescription>> {
    if network_datasets.is_empty() {
        return Err(SupportError::NoDatasets.into());
    }
    let mut datasets = Vec::with_capacity(network_datasets.len());
    for dataset in network_datasets {
        debug!("Describing {dataset}");
        datasets.push(engine.describe(dataset).await?);
    }
    Ok(datasets)
}

/// Publishes the four routing services and, on a federated server,
/// registers them as the portal's utility services.
pub struct RoutingServicePublisher {
    config: PublishConfig,
    client: AdminClient,
    host: Arc<dyn HostSession>,
    engine: Arc<dyn AnalysisEngine>,
    packager: Arc<dyn Packager>,
}

impl RoutingServicePublisher {
    pub fn new(
        config: PublishConfig,
        client: AdminClient,
        host: Arc<dyn HostSession>,
        engine: Arc<dyn AnalysisEngine>,
        packager: Arc<dyn Packager>,
    ) -> Self {
        Self {
            config,
            client,
            host,
            engine,
            packager,
        }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Runs the whole workflow. Intermediate artifacts are removed whether
    /// or not the run succeeds, unless the configuration is verbose.
    pub async fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReport> {
        log_request(request);
        let supporting_folder = request
            .output_folder
            .join(&self.config.supporting_folder_name);

        let mut cleanup = Cleanup::new(self.config.verbose);
        cleanup
            .file(request.output_folder.join(CONNECTION_FILE))
            .file(request.output_folder.join(PROJECT_DOCUMENT))
            .folder(&supporting_folder);

        let result = self.run(request, &supporting_folder).await;
        cleanup.run();
        result
    }

    async fn run(
        &self,
        request: &PublishRequest,
        supporting_folder: &Path,
    ) -> PublishResult<PublishReport> {
        let resolver = TopologyResolver::new(self.client.clone(), Arc::clone(&self.host));
        let mut session = resolver
            .resolve(
                &request.server_url,
                request.username.as_deref(),
                request.password.as_ref(),
            )
            .await?;
        info!(
            "Publishing routing services to {} ({})",
            session.server_url(),
            session.topology().label()
        );

        let datasets = describe_all(self.engine.as_ref(), &request.network_datasets).await?;
        let template = datasets.first().ok_or(SupportError::NoDatasets)?;
        let data_folder = template
            .data_folder()
            .ok_or_else(|| PublishError::InvalidDataset(template.name.clone()))?;
        let item = DataStoreItem::new(
            &self.config.data_store_item_name,
            &request.server_data_folder_path,
            data_folder.to_string_lossy(),
        );

        let folder = self.config.folder_name.as_str();
        ResourceProvisioner::new(&session, &self.config)
            .provision(&item, supporting_folder)
            .await?;

        info!("Creating supporting files in {}", supporting_folder.display());
        SupportingFilesExporter::new(ExportOptions {
            output_folder: supporting_folder.to_path_buf(),
            localized_travel_modes_folder: self.config.localized_travel_modes_folder.clone(),
            service_limits: self.config.service_limits.clone(),
        })
        .export(&datasets)?;

        let connection_file =
            ConnectionDescriptor::for_session(&session, folder).write(&request.output_folder)?;
        let context = DraftContext {
            dataset: template,
            folder,
            output_folder: &request.output_folder,
            supporting_folder,
            connection_file: &connection_file,
        };
        let builder = DraftBuilder::new(
            self.engine.as_ref(),
            self.packager.as_ref(),
            self.config.verbose,
        );
        let mut pipeline = StagingPipeline::new(&request.output_folder);
        for kind in ServiceKind::PUBLISH_ORDER {
            pipeline.add(builder.build(kind, &context).await?);
        }
        pipeline.stage_all(self.packager.as_ref()).await?;
        // Staging can outlast a standalone server token.
        session.ensure_fresh().await?;
        let services = pipeline.upload_all(&session, folder).await?;

        let registration = if session.topology().is_federated() {
            PortalRegistrar::new(&mut session, folder)
                .register(&services)
                .await?
        } else {
            info!("The following routing services have been successfully published to your GIS server");
            for service in &services {
                info!("{}", service.url);
            }
            info!("{}", manual_configuration_message(STANDALONE_INSTRUCTIONS_URL));
            RegistrationOutcome::NotFederated
        };

        Ok(PublishReport {
            topology: session.topology().clone(),
            services,
            registration,
        })
    }
}

fn log_request(request: &PublishRequest) {
    debug!("Network datasets: {}", request.network_datasets.join(";"));
    debug!("Server URL: {}", request.server_url);
    debug!("User name: {}", request.username.as_deref().unwrap_or_default());
    if request.password.is_some() {
        debug!("Password: ********");
    }
    debug!("Server data folder path: {}", request.server_data_folder_path);
    debug!("Output folder: {}", request.output_folder.display());
}
