//! Per-tool service limits.

use crate::error::{SupportError, SupportResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Tools of each geoprocessing service that carries limits.
pub const SERVICE_TOOLS: [(&str, &[&str]); 2] = [
    (
        "NetworkAnalysis",
        &[
            "FindRoutes",
            "FindClosestFacilities",
            "GenerateServiceAreas",
            "SolveLocationAllocation",
            "SolveVehicleRoutingProblem",
        ],
    ),
    ("NetworkAnalysisSync", &["EditVehicleRoutingProblem"]),
];

const BARRIER_LIMITS: [&str; 3] = [
    "maximumFeaturesAffectedByPointBarriers",
    "maximumFeaturesAffectedByLineBarriers",
    "maximumFeaturesAffectedByPolygonBarriers",
];

const VRP_LIMITS: [&str; 3] = ["maximumOrders", "maximumRoutes", "maximumOrdersPerRoute"];

/// Limits of one tool, keyed by limit name. `Null` means unlimited.
pub type ToolLimits = Map<String, Value>;

fn unlimited<'a>(names: &'a [&str]) -> impl Iterator<Item = (String, Value)> + 'a {
    names.iter().map(|name| (name.to_string(), Value::Null))
}

fn units(name: &str, unit: &str) -> (String, Value) {
    (name.to_string(), Value::String(unit.to_string()))
}

/// Limits used when none are configured: everything unlimited, distances
/// in miles and times in minutes.
pub fn default_tool_limits(tool: &str) -> Option<ToolLimits> {
    let mut limits: ToolLimits = unlimited(&BARRIER_LIMITS).collect();
    let hierarchy = [
        ("forceHierarchyBeyondDistance".to_string(), Value::Null),
        units("forceHierarchyBeyondDistanceUnits", "Miles"),
    ];
    match tool {
        "FindClosestFacilities" => {
            limits.extend(unlimited(&[
                "maximumFacilities",
                "maximumFacilitiesToFind",
                "maximumIncidents",
            ]));
            limits.extend(hierarchy);
        }
        "FindRoutes" => {
            limits.extend(unlimited(&["maximumStops", "maximumStopsPerRoute"]));
            limits.extend(hierarchy);
        }
        "GenerateServiceAreas" => {
            limits.extend(unlimited(&[
                "maximumFacilities",
                "maximumNumberOfBreaks",
                "maximumBreakTimeValue",
                "maximumBreakDistanceValue",
                "forceHierarchyBeyondBreakTimeValue",
                "forceHierarchyBeyondBreakDistanceValue",
            ]));
            limits.extend([
                units("maximumBreakTimeValueUnits", "Minutes"),
                units("maximumBreakDistanceValueUnits", "Miles"),
                units("forceHierarchyBeyondBreakTimeValueUnits", "Minutes"),
                units("forceHierarchyBeyondBreakDistanceValueUnits", "Miles"),
            ]);
        }
        "SolveLocationAllocation" => {
            limits.extend(unlimited(&[
                "maximumFacilities",
                "maximumFacilitiesToFind",
                "maximumDemandPoints",
            ]));
            limits.extend(hierarchy);
        }
        "SolveVehicleRoutingProblem" | "EditVehicleRoutingProblem" => {
            limits.extend(unlimited(&VRP_LIMITS));
            limits.extend(hierarchy);
        }
        _ => return None,
    }
    Some(limits)
}

/// Parses `Tool Limit Value;Tool Limit Value;...`.
///
/// `#` means unlimited, numbers become JSON numbers, and anything else
/// (unit names) is kept as text.
pub fn parse_service_limits(limits: &str) -> SupportResult<BTreeMap<String, ToolLimits>> {
    let mut tools: BTreeMap<String, ToolLimits> = BTreeMap::new();
    for entry in limits.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split_whitespace().collect();
        let [tool, limit, value] = parts[..] else {
            return Err(SupportError::InvalidServiceLimit(entry.to_string()));
        };
        let value = if value == "#" {
            Value::Null
        } else {
            value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(value.to_string()))
        };
        tools
            .entry(tool.to_string())
            .or_default()
            .insert(limit.to_string(), value);
    }
    Ok(tools)
}

/// Service limits grouped by service then tool.
///
/// With no configured limits every tool gets its defaults. A tool missing
/// from configured limits also falls back to its defaults.
pub fn service_limits(configured: Option<&str>) -> SupportResult<Value> {
    let parsed = match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(limits) => parse_service_limits(limits)?,
        None => BTreeMap::new(),
    };

    let mut services = Map::new();
    for (service, tools) in SERVICE_TOOLS {
        let mut by_tool = Map::new();
        for tool in tools {
            let limits = parsed
                .get(*tool)
                .cloned()
                .or_else(|| default_tool_limits(tool))
                .unwrap_or_default();
            by_tool.insert(tool.to_string(), Value::Object(limits));
        }
        services.insert(service.to_string(), Value::Object(by_tool));
    }
    Ok(Value::Object(services))
}
