//! The packaging collaborator: drafts and staged service definitions.

use crate::command::run_json;
use crate::draft::{AnalyzerReport, ServiceDefinitionDraft};
use crate::engine::AnalysisArtifact;
use crate::error::PublishResult;
use async_trait::async_trait;
use netpub_types::{ExecutionMode, ServiceKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything needed to write one service definition draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    pub kind: ServiceKind,
    /// Where the packager must write the draft.
    pub draft_path: PathBuf,
    pub service_name: String,
    pub folder: String,
    pub summary: String,
    pub tags: String,
    pub execution_mode: ExecutionMode,
    /// Connection descriptor for the target server.
    pub connection_file: PathBuf,
    /// Project document listing the analysis layers, for map services.
    pub project_document: Option<PathBuf>,
    /// Tool results, for geoprocessing services.
    pub artifacts: Vec<AnalysisArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRequest {
    pub package_path: PathBuf,
}

/// A deployable service definition on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPackage {
    pub kind: ServiceKind,
    pub path: PathBuf,
}

#[async_trait]
pub trait Packager: Send + Sync {
    /// Writes and analyzes a draft.
    async fn create_draft(&self, request: &DraftRequest) -> PublishResult<ServiceDefinitionDraft>;

    /// Converts a saved draft into a deployable package.
    async fn stage(
        &self,
        draft: &ServiceDefinitionDraft,
        request: &StageRequest,
    ) -> PublishResult<StagedPackage>;
}

/// A packager reached through an external executable.
///
/// `create-draft` receives a [`DraftRequest`] and prints an analyzer report;
/// `stage` receives `{draftPath, packagePath}` and prints `{messages}`.
#[derive(Debug, Clone)]
pub struct CommandPackager {
    program: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StageCommand<'a> {
    draft_path: &'a Path,
    package_path: &'a Path,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StageOutput {
    messages: Vec<String>,
}

impl CommandPackager {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Packager for CommandPackager {
    async fn create_draft(&self, request: &DraftRequest) -> PublishResult<ServiceDefinitionDraft> {
        let report: AnalyzerReport = run_json(&self.program, "create-draft", request).await?;
        ServiceDefinitionDraft::load(request.kind, &request.draft_path, report)
    }

    async fn stage(
        &self,
        draft: &ServiceDefinitionDraft,
        request: &StageRequest,
    ) -> PublishResult<StagedPackage> {
        let command = StageCommand {
            draft_path: draft.path(),
            package_path: &request.package_path,
        };
        let output: StageOutput = run_json(&self.program, "stage", &command).await?;
        for message in output.messages {
            debug!("{message}");
        }
        Ok(StagedPackage {
            kind: draft.kind(),
            path: request.package_path.clone(),
        })
    }
}
