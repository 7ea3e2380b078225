//! The network analysis engine collaborator.
//!
//! The engine owns every geometry computation. The workflow only asks it to
//! describe datasets, build analysis layers, and run the tools whose results
//! become geoprocessing services.

use crate::command::run_json;
use crate::error::PublishResult;
use async_trait::async_trait;
use netpub_types::NetworkDatasetDescription;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Solvers the map service exposes through its network analysis layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverKind {
    Route,
    ClosestFacility,
    ServiceArea,
}

impl SolverKind {
    /// Layers of the map service, in drawing order.
    pub const MAP_LAYERS: [SolverKind; 3] = [
        SolverKind::ClosestFacility,
        SolverKind::ServiceArea,
        SolverKind::Route,
    ];

    pub fn layer_name(&self) -> &'static str {
        match self {
            Self::Route => "Route",
            Self::ClosestFacility => "ClosestFacility",
            Self::ServiceArea => "ServiceArea",
        }
    }
}

/// Geoprocessing tools whose results are packaged into services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisTool {
    GetToolInfo,
    GetTravelModes,
    FindRoutes,
    FindClosestFacilities,
    GenerateServiceAreas,
    SolveLocationAllocation,
    SolveVehicleRoutingProblem,
    EditVehicleRoutingProblem,
}

impl AnalysisTool {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetToolInfo => "GetToolInfo",
            Self::GetTravelModes => "GetTravelModes",
            Self::FindRoutes => "FindRoutes",
            Self::FindClosestFacilities => "FindClosestFacilities",
            Self::GenerateServiceAreas => "GenerateServiceAreas",
            Self::SolveLocationAllocation => "SolveLocationAllocation",
            Self::SolveVehicleRoutingProblem => "SolveVehicleRoutingProblem",
            Self::EditVehicleRoutingProblem => "EditVehicleRoutingProblem",
        }
    }
}

/// One tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRun {
    pub tool: AnalysisTool,
    /// Catalog path of the network dataset the tool solves on.
    pub network_dataset: PathBuf,
    pub parameters: Map<String, Value>,
}

impl ToolRun {
    pub fn new(tool: AnalysisTool, network_dataset: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            network_dataset: network_dataset.into(),
            parameters: Map::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }
}

/// Something the engine produced that a draft can reference: a layer file
/// or a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    pub name: String,
    pub path: PathBuf,
}

#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Loads the schema of the network dataset at `dataset`.
    async fn describe(&self, dataset: &str) -> PublishResult<NetworkDatasetDescription>;

    /// Builds an analysis layer for `solver` that accumulates `cost_attribute`.
    async fn make_analysis_layer(
        &self,
        dataset: &NetworkDatasetDescription,
        solver: SolverKind,
        cost_attribute: &str,
    ) -> PublishResult<AnalysisArtifact>;

    async fn run_tool(&self, run: &ToolRun) -> PublishResult<AnalysisArtifact>;
}

/// An engine reached through an external executable.
///
/// Sub-commands are `describe`, `make-layer`, and `run-tool`.
#[derive(Debug, Clone)]
pub struct CommandAnalysisEngine {
    program: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerRequest<'a> {
    network_dataset: &'a Path,
    solver: SolverKind,
    cost_attribute: &'a str,
}

impl CommandAnalysisEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl AnalysisEngine for CommandAnalysisEngine {
    async fn describe(&self, dataset: &str) -> PublishResult<NetworkDatasetDescription> {
        run_json(
            &self.program,
            "describe",
            &serde_json::json!({ "networkDataset": dataset }),
        )
        .await
    }

    async fn make_analysis_layer(
        &self,
        dataset: &NetworkDatasetDescription,
        solver: SolverKind,
        cost_attribute: &str,
    ) -> PublishResult<AnalysisArtifact> {
        let request = LayerRequest {
            network_dataset: &dataset.catalog_path,
            solver,
            cost_attribute,
        };
        run_json(&self.program, "make-layer", &request).await
    }

    async fn run_tool(&self, run: &ToolRun) -> PublishResult<AnalysisArtifact> {
        run_json(&self.program, "run-tool", run).await
    }
}
