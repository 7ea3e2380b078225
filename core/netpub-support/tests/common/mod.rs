//! Shared dataset builders for supporting file tests.

#![allow(dead_code)]

use netpub_types::{
    AttributeParameter, Extent, NetworkAttribute, NetworkDatasetDescription, NetworkType,
    TrafficInfo, UsageType,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub fn attribute(name: &str, usage_type: UsageType, units: &str, default: bool) -> NetworkAttribute {
    NetworkAttribute {
        name: name.into(),
        data_type: "Double".into(),
        units: units.into(),
        usage_type,
        use_by_default: default,
        parameters: Vec::new(),
        traffic_support_type: None,
        evaluator_types: Vec::new(),
    }
}

pub fn time_cost(name: &str, default: bool) -> NetworkAttribute {
    attribute(name, UsageType::Cost, "Minutes", default)
}

pub fn distance_cost(name: &str, default: bool) -> NetworkAttribute {
    attribute(name, UsageType::Cost, "Miles", default)
}

pub fn restriction(name: &str, default: bool) -> NetworkAttribute {
    let mut attr = attribute(name, UsageType::Restriction, "Unknown", default);
    attr.data_type = "Boolean".into();
    attr.parameters.push(AttributeParameter {
        name: "Restriction Usage".into(),
        data_type: "Double".into(),
        usage_type: Some("Restriction".into()),
        default_value: Some("-1.0".into()),
    });
    attr
}

pub fn travel_mode(impedance: &str, time: &str, distance: &str, restrictions: &[&str]) -> Value {
    json!({
        "impedanceAttributeName": impedance,
        "timeAttributeName": time,
        "distanceAttributeName": distance,
        "restrictionAttributeNames": restrictions,
        "attributeParameterValues": restrictions.iter().map(|r| json!({
            "attributeName": r,
            "parameterName": "Restriction Usage",
            "value": -1.0
        })).collect::<Vec<_>>(),
    })
}

pub fn dataset(name: &str, attributes: Vec<NetworkAttribute>) -> NetworkDatasetDescription {
    NetworkDatasetDescription {
        name: name.into(),
        catalog_path: PathBuf::from(format!("/data/routing/streets.gdb/Transportation/{name}")),
        network_type: NetworkType::Geodatabase,
        attributes,
        sources: vec!["Streets".into(), "Streets_ND_Junctions".into(), "RestrictedTurns".into()],
        turn_sources: vec!["RestrictedTurns".into()],
        extent: Extent {
            xmin: -122.5,
            ymin: 37.7,
            xmax: -122.3,
            ymax: 37.8,
        },
        travel_modes: BTreeMap::new(),
        default_travel_mode_name: None,
        traffic: TrafficInfo::default(),
    }
}

/// One time cost "Minutes" used by default, one distance cost, and a
/// default "Driving" restriction, with a driving time travel mode.
pub fn simple_dataset() -> NetworkDatasetDescription {
    let mut desc = dataset(
        "Streets_ND",
        vec![
            time_cost("Minutes", true),
            distance_cost("Miles", false),
            restriction("Driving", true),
        ],
    );
    desc.travel_modes.insert(
        "Driving Time".into(),
        travel_mode("Minutes", "Minutes", "Miles", &["Driving"]),
    );
    desc
}
