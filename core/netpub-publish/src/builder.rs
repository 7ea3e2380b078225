//! Builds the service definition draft of each routing service.
//!
//! The map service is drafted from a project document of analysis layers;
//! the geoprocessing services are drafted from tool results. The map draft
//! is then adjusted: geometry export off, network analysis on.

use crate::artifacts::ProjectDocument;
use crate::draft::ServiceDefinitionDraft;
use crate::engine::{AnalysisArtifact, AnalysisEngine, AnalysisTool, SolverKind, ToolRun};
use crate::error::PublishResult;
use crate::packager::{DraftRequest, Packager};
use netpub_support::{SupportError, TRAVEL_MODES_FILE};
use netpub_types::{NetworkDatasetDescription, ServiceKind};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Capability toggles applied to the map draft.
pub const MAP_CAPABILITIES: [(&str, bool); 2] = [("KmlServer", false), ("NAServer", true)];

const BREAK_VALUES: &str = "5 10 15";
const TIME_UNITS: &str = "Minutes";
const DISTANCE_UNITS: &str = "Miles";

/// Inputs shared by every draft of a run.
#[derive(Debug, Clone, Copy)]
pub struct DraftContext<'a> {
    /// The dataset the services solve on.
    pub dataset: &'a NetworkDatasetDescription,
    pub folder: &'a str,
    /// Receives drafts, staged packages, and the project document.
    pub output_folder: &'a Path,
    pub supporting_folder: &'a Path,
    pub connection_file: &'a Path,
}

pub struct DraftBuilder<'a> {
    engine: &'a dyn AnalysisEngine,
    packager: &'a dyn Packager,
    verbose: bool,
}

impl<'a> DraftBuilder<'a> {
    pub fn new(engine: &'a dyn AnalysisEngine, packager: &'a dyn Packager, verbose: bool) -> Self {
        Self {
            engine,
            packager,
            verbose,
        }
    }

    pub async fn build(
        &self,
        kind: ServiceKind,
        context: &DraftContext<'_>,
    ) -> PublishResult<ServiceDefinitionDraft> {
        info!("Creating the {} draft", kind.describe());
        let draft = match kind {
            ServiceKind::Map => self.build_map(context).await?,
            _ => {
                let mut artifacts = Vec::new();
                for run in tool_runs(kind, context) {
                    debug!("Running {}", run.tool.name());
                    artifacts.push(self.engine.run_tool(&run).await?);
                }
                let request = draft_request(kind, context, None, artifacts);
                self.packager.create_draft(&request).await?
            }
        };

        if self.verbose {
            let copy = xml_copy_path(draft.path());
            std::fs::copy(draft.path(), &copy)?;
            debug!("Copied draft to {}", copy.display());
        }
        Ok(draft)
    }

    async fn build_map(&self, context: &DraftContext<'_>) -> PublishResult<ServiceDefinitionDraft> {
        let dataset = context.dataset;
        let cost = dataset
            .default_cost_attribute()
            .ok_or_else(|| SupportError::MissingCostAttribute {
                dataset: dataset.name.clone(),
                kind: "cost",
            })?;

        let mut layers = Vec::new();
        for solver in SolverKind::MAP_LAYERS {
            debug!("Creating {} layer with {cost}", solver.layer_name());
            layers.push(self.engine.make_analysis_layer(dataset, solver, cost).await?);
        }
        let project = ProjectDocument {
            network_dataset: dataset.catalog_path.clone(),
            cost_attribute: cost.to_string(),
            layers: layers.clone(),
        }
        .write(context.output_folder)?;

        let request = draft_request(ServiceKind::Map, context, Some(project), layers);
        let mut draft = self.packager.create_draft(&request).await?;
        for (capability, enabled) in MAP_CAPABILITIES {
            if !draft.set_capability_enabled(capability, enabled) {
                warn!("{} draft has no {capability} capability", ServiceKind::Map.describe());
            }
        }
        draft.save()?;
        Ok(draft)
    }
}

fn draft_request(
    kind: ServiceKind,
    context: &DraftContext<'_>,
    project_document: Option<PathBuf>,
    artifacts: Vec<AnalysisArtifact>,
) -> DraftRequest {
    DraftRequest {
        kind,
        draft_path: context
            .output_folder
            .join(format!("{}.sddraft", kind.file_stem())),
        service_name: kind.service_name().to_string(),
        folder: context.folder.to_string(),
        summary: kind.summary().to_string(),
        tags: kind.tags().to_string(),
        execution_mode: kind.execution_mode(),
        connection_file: context.connection_file.to_path_buf(),
        project_document,
        artifacts,
    }
}

/// The tool runs whose results make up a geoprocessing service.
pub fn tool_runs(kind: ServiceKind, context: &DraftContext<'_>) -> Vec<ToolRun> {
    let dataset = &context.dataset.catalog_path;
    let supporting = context.supporting_folder.to_string_lossy().into_owned();
    let run = |tool| ToolRun::new(tool, dataset.clone()).with("supportingFiles", supporting.clone());
    let vrp = |tool| {
        run(tool)
            .with("timeUnits", TIME_UNITS)
            .with("distanceUnits", DISTANCE_UNITS)
    };

    match kind {
        ServiceKind::Map => Vec::new(),
        ServiceKind::UtilitiesGp => vec![
            run(AnalysisTool::GetToolInfo),
            run(AnalysisTool::GetTravelModes).with(
                "travelModes",
                context
                    .supporting_folder
                    .join(TRAVEL_MODES_FILE)
                    .to_string_lossy()
                    .into_owned(),
            ),
        ],
        ServiceKind::MainGp => vec![
            run(AnalysisTool::FindRoutes).with("measurementUnits", TIME_UNITS),
            run(AnalysisTool::FindClosestFacilities).with("measurementUnits", TIME_UNITS),
            run(AnalysisTool::GenerateServiceAreas).with("breakValues", BREAK_VALUES),
            run(AnalysisTool::SolveLocationAllocation).with("measurementUnits", TIME_UNITS),
            vrp(AnalysisTool::SolveVehicleRoutingProblem),
        ],
        ServiceKind::SyncVrpGp => vec![vrp(AnalysisTool::EditVehicleRoutingProblem)],
    }
}

/// `<draft>.xml`, the inspection copy kept in verbose mode.
pub fn xml_copy_path(draft: &Path) -> PathBuf {
    let mut path = OsString::from(draft.as_os_str());
    path.push(".xml");
    PathBuf::from(path)
}
