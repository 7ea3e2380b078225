//! `ToolInfo.json`: the template dataset's description and service limits.

use crate::restriction::{is_usage_parameter, map_usage};
use crate::travel_modes::TravelModesDocument;
use netpub_types::{NetworkAttribute, NetworkDatasetDescription, TrafficInfo};
use serde_json::{Value, json};

pub const TRAFFIC_NONE: &str = "NONE";
pub const TRAFFIC_HISTORICAL: &str = "HISTORICAL";
pub const TRAFFIC_HISTORICAL_AND_LIVE: &str = "HISTORICAL_AND_LIVE";

const TRAFFIC_EVALUATOR: &str = "NetworkEdgeTraffic";

/// Traffic support of the dataset, derived when the engine does not
/// declare it.
pub fn dataset_traffic_support(traffic: &TrafficInfo) -> String {
    if let Some(declared) = traffic.support_type.as_deref().filter(|s| !s.is_empty()) {
        return declared.to_string();
    }
    let has_feed = traffic
        .live_feed_location
        .as_deref()
        .is_some_and(|feed| !feed.is_empty());
    let derived = match (traffic.supports_historical, traffic.supports_live && has_feed) {
        (true, true) => TRAFFIC_HISTORICAL_AND_LIVE,
        (true, false) => TRAFFIC_HISTORICAL,
        (false, _) => TRAFFIC_NONE,
    };
    derived.to_string()
}

/// Traffic support of an attribute: declared, or the dataset's when the
/// attribute is evaluated from traffic data.
pub fn attribute_traffic_support(attribute: &NetworkAttribute, dataset_support: &str) -> String {
    if let Some(declared) = attribute
        .traffic_support_type
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        return declared.to_string();
    }
    let uses_traffic = attribute
        .evaluator_types
        .iter()
        .any(|evaluator| evaluator.eq_ignore_ascii_case(TRAFFIC_EVALUATOR));
    if uses_traffic {
        dataset_support.to_string()
    } else {
        TRAFFIC_NONE.to_string()
    }
}

/// The `networkDataset` object of the tool info document.
pub fn network_dataset_info(
    desc: &NetworkDatasetDescription,
    travel_modes: &TravelModesDocument,
) -> Value {
    let traffic_support = dataset_traffic_support(&desc.traffic);
    let mut parameter_values = Vec::new();
    let mut attributes = Vec::with_capacity(desc.attributes.len());

    for attribute in &desc.attributes {
        let usage_parameter = attribute
            .parameters
            .iter()
            .rfind(|p| p.is_restriction_usage())
            .map(|p| p.name.clone());

        for parameter in &attribute.parameters {
            let value = parameter.default_value.as_deref().map(|value| {
                if is_usage_parameter(parameter) {
                    map_usage(value)
                } else {
                    value.to_string()
                }
            });
            parameter_values.push(json!({
                "attributeName": attribute.name,
                "parameterName": parameter.name,
                "parameterType": parameter.data_type,
                "value": value,
            }));
        }

        attributes.push(json!({
            "name": attribute.name,
            "dataType": attribute.data_type,
            "units": attribute.units,
            "usageType": attribute.usage_type.as_str(),
            "parameterNames": attribute.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "restrictionUsageParameterName": usage_parameter,
            "trafficSupport": attribute_traffic_support(attribute, &traffic_support),
        }));
    }

    json!({
        "attributeParameterValues": parameter_values,
        "networkAttributes": attributes,
        "supportedTravelModes": travel_modes.supported,
        "trafficSupport": traffic_support,
    })
}

/// The complete tool info document.
pub fn tool_info(
    desc: &NetworkDatasetDescription,
    travel_modes: &TravelModesDocument,
    service_limits: Value,
) -> Value {
    json!({
        "networkDataset": network_dataset_info(desc, travel_modes),
        "serviceLimits": service_limits,
    })
}
