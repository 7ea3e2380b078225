//! Per-dataset properties consumed by the routing services at run time.
//!
//! Each dataset becomes one section of `NetworkDatasetProperties.ini`.
//! Structured values (parameter tables, extent, travel mode keys) are
//! stored as JSON strings.

use crate::error::{SupportError, SupportResult};
use crate::restriction::{is_usage_parameter, map_usage};
use netpub_types::{NetworkDatasetDescription, NetworkType};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};

/// Travel modes whose type is the first word of their name.
const WELL_KNOWN_TRAVEL_MODES: [&str; 8] = [
    "DRIVING TIME",
    "DRIVING DISTANCE",
    "TRUCKING TIME",
    "TRUCKING DISTANCE",
    "WALKING TIME",
    "WALKING DISTANCE",
    "RURAL DRIVING TIME",
    "RURAL DRIVING DISTANCE",
];

const CUSTOM_TRAVEL_MODE_TEMPLATE: &str = "DRIVING TIME";
const WALKING_RESTRICTION: &str = "Walking";
const TRUCKING_RESTRICTION: &str = "Driving a Truck";

/// Cost attributes split by unit, with their units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostAttributes {
    pub time: BTreeMap<String, String>,
    pub distance: BTreeMap<String, String>,
    flagged_time: Option<String>,
    flagged_distance: Option<String>,
}

impl CostAttributes {
    pub fn from_description(desc: &NetworkDatasetDescription) -> Self {
        let mut costs = Self::default();
        for attribute in desc.cost_attributes() {
            if attribute.is_time_based() {
                costs
                    .time
                    .insert(attribute.name.clone(), attribute.units.clone());
                if attribute.use_by_default {
                    costs.flagged_time = Some(attribute.name.clone());
                }
            } else {
                costs
                    .distance
                    .insert(attribute.name.clone(), attribute.units.clone());
                if attribute.use_by_default {
                    costs.flagged_distance = Some(attribute.name.clone());
                }
            }
        }
        costs
    }

    /// The flagged time attribute, else the alphabetically first one.
    pub fn default_time_attribute(&self) -> Option<&str> {
        self.flagged_time
            .as_deref()
            .or_else(|| self.time.keys().next().map(String::as_str))
    }

    /// The flagged distance attribute, else the alphabetically last one.
    ///
    /// The fallback deliberately differs from the time attribute's.
    pub fn default_distance_attribute(&self) -> Option<&str> {
        self.flagged_distance
            .as_deref()
            .or_else(|| self.distance.keys().next_back().map(String::as_str))
    }

    /// `preferred` when it is a time attribute, else the first one.
    fn time_attribute_or_first<'a>(&'a self, preferred: &'a str) -> Option<&'a str> {
        if self.time.contains_key(preferred) {
            Some(preferred)
        } else {
            self.time.keys().next().map(String::as_str)
        }
    }

    fn is_time(&self, name: &str) -> Option<bool> {
        if self.time.contains_key(name) {
            Some(true)
        } else if self.distance.contains_key(name) {
            Some(false)
        } else {
            None
        }
    }
}

/// A travel mode keyed by its type and whether it minimizes time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelModeKey {
    pub travel_mode_type: String,
    pub is_time_based: bool,
    pub name: String,
}

/// The properties of one dataset, keyed by property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProperties {
    pub dataset: String,
    pub values: BTreeMap<String, String>,
}

impl NetworkProperties {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Derives the properties section for one dataset.
pub fn network_properties(desc: &NetworkDatasetDescription) -> SupportResult<NetworkProperties> {
    let costs = CostAttributes::from_description(desc);
    let missing = |kind| SupportError::MissingCostAttribute {
        dataset: desc.name.clone(),
        kind,
    };
    let time_attribute = costs.default_time_attribute().ok_or_else(|| missing("time"))?;
    let distance_attribute = costs
        .default_distance_attribute()
        .ok_or_else(|| missing("distance"))?;

    let mut values = BTreeMap::new();
    let mut set = |key: &str, value: String| {
        values.insert(key.to_string(), value);
    };

    set("time_attribute", time_attribute.to_string());
    set("time_attribute_units", costs.time[time_attribute].clone());
    set("distance_attribute", distance_attribute.to_string());
    set(
        "distance_attribute_units",
        costs.distance[distance_attribute].clone(),
    );
    for (key, preferred) in [
        ("walk_time_attribute", "WalkTime"),
        ("truck_time_attribute", "TruckTravelTime"),
        ("time_neutral_attribute", "Minutes"),
    ] {
        let name = costs
            .time_attribute_or_first(preferred)
            .unwrap_or(time_attribute);
        set(key, name.to_string());
        set(&format!("{key}_units"), costs.time[name].clone());
    }

    let restrictions: Vec<&str> = desc
        .restriction_attributes()
        .map(|a| a.name.as_str())
        .collect();
    let default_restrictions: Vec<&str> = desc
        .restriction_attributes()
        .filter(|a| a.use_by_default)
        .map(|a| a.name.as_str())
        .collect();
    let non_walking: Vec<&str> = restrictions
        .iter()
        .copied()
        .filter(|name| name.starts_with("Driving"))
        .collect();
    let alias = |name: &str| {
        if restrictions.contains(&name) {
            name.to_string()
        } else {
            String::new()
        }
    };
    set("restrictions", restrictions.join(";"));
    set("default_restrictions", default_restrictions.join(";"));
    set("non_walking_restrictions", non_walking.join(";"));
    set("walking_restriction", alias(WALKING_RESTRICTION));
    set("trucking_restriction", alias(TRUCKING_RESTRICTION));

    set(
        "attribute_parameter_values",
        attribute_parameter_values(desc).to_string(),
    );
    set("feature_locator_where_clause", feature_locator_where_clause(desc));
    let extent = desc.extent;
    set(
        "extent",
        json!([extent.xmin, extent.ymin, extent.xmax, extent.ymax]).to_string(),
    );
    set(
        "travel_modes",
        serde_json::to_string(&travel_mode_keys(desc, &costs))?,
    );
    set("default_custom_travel_mode", default_custom_travel_mode(desc));

    Ok(NetworkProperties {
        dataset: desc.name.clone(),
        values,
    })
}

/// Every attribute parameter with its default, restriction usage values
/// mapped to keywords.
fn attribute_parameter_values(desc: &NetworkDatasetDescription) -> Value {
    let rows: Vec<Value> = desc
        .attributes
        .iter()
        .flat_map(|attribute| {
            attribute.parameters.iter().map(move |parameter| {
                let value = parameter.default_value.as_deref().map(|value| {
                    if is_usage_parameter(parameter) {
                        map_usage(value)
                    } else {
                        value.to_string()
                    }
                });
                json!({
                    "attributeName": attribute.name,
                    "parameterName": parameter.name,
                    "value": value,
                })
            })
        })
        .collect();
    Value::Array(rows)
}

/// Locator clause searching every edge and junction source but not turns.
pub fn feature_locator_where_clause(desc: &NetworkDatasetDescription) -> String {
    let sources: BTreeSet<&str> = match desc.network_type {
        NetworkType::Sdc => BTreeSet::from(["SDC Edge Source"]),
        _ => {
            let turns: BTreeSet<&str> = desc.turn_sources.iter().map(String::as_str).collect();
            desc.sources
                .iter()
                .map(String::as_str)
                .filter(|source| !turns.contains(source))
                .collect()
        }
    };
    sources
        .iter()
        .map(|source| format!("\"{source}\" #"))
        .collect::<Vec<_>>()
        .join(";")
}

/// Travel modes whose impedance is a known cost attribute.
pub fn travel_mode_keys(
    desc: &NetworkDatasetDescription,
    costs: &CostAttributes,
) -> Vec<TravelModeKey> {
    let mut keyed: BTreeMap<(String, bool), String> = BTreeMap::new();
    for (name, mode) in &desc.travel_modes {
        let name = name.to_uppercase();
        let Some(is_time_based) = mode
            .get("impedanceAttributeName")
            .and_then(Value::as_str)
            .and_then(|impedance| costs.is_time(impedance))
        else {
            continue;
        };
        let travel_mode_type = if WELL_KNOWN_TRAVEL_MODES.contains(&name.as_str()) {
            name.split(' ').next().unwrap_or_default().to_string()
        } else {
            name.clone()
        };
        keyed.insert((travel_mode_type, is_time_based), name);
    }
    keyed
        .into_iter()
        .map(|((travel_mode_type, is_time_based), name)| TravelModeKey {
            travel_mode_type,
            is_time_based,
            name,
        })
        .collect()
}

/// The JSON of the driving time travel mode, used to seed custom travel
/// mode parameters. Empty when the dataset has none.
fn default_custom_travel_mode(desc: &NetworkDatasetDescription) -> String {
    desc.travel_modes
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(CUSTOM_TRAVEL_MODE_TEMPLATE))
        .map(|(_, mode)| mode.to_string())
        .unwrap_or_default()
}
