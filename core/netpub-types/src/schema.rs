//! Network dataset schema as reported by the analysis engine.
//!
//! The engine describes each dataset once per run. The description is a
//! closed, typed snapshot: attribute parameters are listed explicitly
//! instead of being probed for by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Units that make a cost attribute time-based. Anything else is distance.
pub const TIME_UNITS: [&str; 4] = ["Minutes", "Hours", "Days", "Seconds"];

/// How a network attribute is used by solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageType {
    Cost,
    Restriction,
    Descriptor,
    Hierarchy,
}

impl UsageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cost => "Cost",
            Self::Restriction => "Restriction",
            Self::Descriptor => "Descriptor",
            Self::Hierarchy => "Hierarchy",
        }
    }
}

/// One parameter of a network attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeParameter {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    /// `Restriction` marks the parameter that scales restriction usage.
    #[serde(default)]
    pub usage_type: Option<String>,
    /// Default value as the engine prints it (for example `-1.0`).
    #[serde(default)]
    pub default_value: Option<String>,
}

impl AttributeParameter {
    /// Returns true if this parameter controls restriction usage.
    pub fn is_restriction_usage(&self) -> bool {
        self.usage_type
            .as_deref()
            .is_some_and(|usage| usage.eq_ignore_ascii_case("restriction"))
    }
}

/// A cost, restriction, descriptor, or hierarchy attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttribute {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub units: String,
    pub usage_type: UsageType,
    #[serde(default)]
    pub use_by_default: bool,
    #[serde(default)]
    pub parameters: Vec<AttributeParameter>,
    /// Traffic support declared by the engine, when it reports one.
    #[serde(default)]
    pub traffic_support_type: Option<String>,
    #[serde(default)]
    pub evaluator_types: Vec<String>,
}

impl NetworkAttribute {
    pub fn is_cost(&self) -> bool {
        self.usage_type == UsageType::Cost
    }

    pub fn is_restriction(&self) -> bool {
        self.usage_type == UsageType::Restriction
    }

    /// Returns true if the attribute's units are a time unit.
    pub fn is_time_based(&self) -> bool {
        TIME_UNITS.contains(&self.units.as_str())
    }
}

/// Storage model of the network dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NetworkType {
    #[default]
    Geodatabase,
    Shapefile,
    /// Street data compressed datasets have a single synthetic edge source.
    #[serde(rename = "SDC")]
    Sdc,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// Traffic capabilities of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficInfo {
    /// Traffic support declared by the engine, when it reports one.
    #[serde(default)]
    pub support_type: Option<String>,
    #[serde(default)]
    pub supports_historical: bool,
    #[serde(default)]
    pub supports_live: bool,
    #[serde(default)]
    pub live_feed_location: Option<String>,
}

/// Schema snapshot of one network dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDatasetDescription {
    /// Name as given on the command line; used as the properties section.
    pub name: String,
    pub catalog_path: PathBuf,
    #[serde(default)]
    pub network_type: NetworkType,
    pub attributes: Vec<NetworkAttribute>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub turn_sources: Vec<String>,
    #[serde(default)]
    pub extent: Extent,
    /// Travel mode name to travel mode JSON.
    #[serde(default)]
    pub travel_modes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub default_travel_mode_name: Option<String>,
    #[serde(default)]
    pub traffic: TrafficInfo,
}

impl NetworkDatasetDescription {
    pub fn cost_attributes(&self) -> impl Iterator<Item = &NetworkAttribute> {
        self.attributes.iter().filter(|a| a.is_cost())
    }

    pub fn restriction_attributes(&self) -> impl Iterator<Item = &NetworkAttribute> {
        self.attributes.iter().filter(|a| a.is_restriction())
    }

    /// The cost attribute analysis layers are built with: the first cost
    /// attribute used by default, else the last cost attribute.
    pub fn default_cost_attribute(&self) -> Option<&str> {
        self.cost_attributes()
            .find(|a| a.use_by_default)
            .or_else(|| self.cost_attributes().last())
            .map(|a| a.name.as_str())
    }

    /// The folder registered in the data store: the directory holding the
    /// geodatabase that contains the dataset.
    pub fn data_folder(&self) -> Option<&Path> {
        self.catalog_path.ancestors().nth(3)
    }
}
