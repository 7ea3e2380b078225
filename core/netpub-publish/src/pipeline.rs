//! Staging and upload of the routing services.
//!
//! Each service moves `Drafted -> Staged -> Uploaded`. All services are
//! staged before any is uploaded, and both passes walk
//! [`ServiceKind::PUBLISH_ORDER`]. The first failure aborts the run; services
//! uploaded before it stay published.

use crate::draft::ServiceDefinitionDraft;
use crate::error::{PublishError, PublishResult};
use crate::packager::{Packager, StageRequest, StagedPackage};
use netpub_admin::AdminSession;
use netpub_types::{PublishedService, ServiceKind};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub enum ServiceState {
    Drafted(ServiceDefinitionDraft),
    Staged(StagedPackage),
    Uploaded(PublishedService),
}

impl ServiceState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drafted(_) => "drafted",
            Self::Staged(_) => "staged",
            Self::Uploaded(_) => "uploaded",
        }
    }
}

pub struct StagingPipeline {
    definition_folder: PathBuf,
    states: BTreeMap<ServiceKind, ServiceState>,
}

impl StagingPipeline {
    /// Staged packages are written into `definition_folder`.
    pub fn new(definition_folder: impl Into<PathBuf>) -> Self {
        Self {
            definition_folder: definition_folder.into(),
            states: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, draft: ServiceDefinitionDraft) {
        self.states.insert(draft.kind(), ServiceState::Drafted(draft));
    }

    pub fn state(&self, kind: ServiceKind) -> Option<&ServiceState> {
        self.states.get(&kind)
    }

    pub fn package_path(&self, kind: ServiceKind) -> PathBuf {
        self.definition_folder.join(format!("{}.sd", kind.file_stem()))
    }

    /// Stages every drafted service. Analyzer errors are fatal; warnings
    /// are logged.
    pub async fn stage_all(&mut self, packager: &dyn Packager) -> PublishResult<()> {
        for kind in ServiceKind::PUBLISH_ORDER {
            let staged = match self.states.get(&kind) {
                Some(ServiceState::Drafted(draft)) => {
                    check_analysis(draft)?;
                    let request = StageRequest {
                        package_path: self.package_path(kind),
                    };
                    info!(
                        "Creating {} definition at {}",
                        kind.describe(),
                        request.package_path.display()
                    );
                    packager.stage(draft, &request).await?
                }
                Some(_) => continue,
                None => return Err(out_of_order(kind, "drafting")),
            };
            self.states.insert(kind, ServiceState::Staged(staged));
        }
        Ok(())
    }

    /// Uploads every staged service into `folder` and returns the published
    /// services in publish order.
    pub async fn upload_all(
        &mut self,
        session: &AdminSession,
        folder: &str,
    ) -> PublishResult<Vec<PublishedService>> {
        info!("Publishing service definitions as services");
        let mut published = Vec::with_capacity(ServiceKind::PUBLISH_ORDER.len());
        for kind in ServiceKind::PUBLISH_ORDER {
            let service = match self.states.get(&kind) {
                Some(ServiceState::Staged(package)) => {
                    let identity = kind.identity();
                    let url = session
                        .publish_package(&package.path, folder, &identity)
                        .await?;
                    PublishedService {
                        kind,
                        identity,
                        url,
                    }
                }
                Some(ServiceState::Uploaded(service)) => service.clone(),
                _ => return Err(out_of_order(kind, "staging")),
            };
            self.states
                .insert(kind, ServiceState::Uploaded(service.clone()));
            published.push(service);
        }
        Ok(published)
    }
}

fn check_analysis(draft: &ServiceDefinitionDraft) -> PublishResult<()> {
    let report = draft.analysis();
    for warning in &report.warnings {
        warn!("{}: {warning}", draft.kind().describe());
    }
    if report.has_errors() {
        return Err(PublishError::AnalyzerErrors {
            kind: draft.kind().describe().to_string(),
            errors: report.errors.clone(),
        });
    }
    Ok(())
}

fn out_of_order(kind: ServiceKind, stage: &'static str) -> PublishError {
    PublishError::OutOfOrder {
        kind: kind.describe().to_string(),
        stage,
    }
}
