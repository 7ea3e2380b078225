mod common;

use common::*;
use netpub_support::{CostAttributes, SupportError, network_properties};
use netpub_types::NetworkType;
use pretty_assertions::assert_eq;

// ── Default cost attribute selection ────────────────────────────

#[test]
fn flagged_time_attribute_wins() {
    let desc = dataset(
        "nd",
        vec![time_cost("Minutes", false), time_cost("TravelTime", true)],
    );
    let costs = CostAttributes::from_description(&desc);
    assert_eq!(costs.default_time_attribute(), Some("TravelTime"));
}

#[test]
fn unflagged_time_attribute_falls_back_to_alphabetically_first() {
    let desc = dataset("nd", vec![time_cost("B", false), time_cost("A", false)]);
    let costs = CostAttributes::from_description(&desc);
    assert_eq!(costs.default_time_attribute(), Some("A"));
}

#[test]
fn unflagged_distance_attribute_falls_back_to_alphabetically_last() {
    let desc = dataset(
        "nd",
        vec![distance_cost("Miles", false), distance_cost("Kilometers", false)],
    );
    let costs = CostAttributes::from_description(&desc);
    assert_eq!(costs.default_distance_attribute(), Some("Miles"));
}

#[test]
fn time_and_distance_fallbacks_break_ties_in_opposite_directions() {
    let mut a = time_cost("A", false);
    let mut b = time_cost("B", false);
    let desc = dataset("nd", vec![a.clone(), b.clone()]);
    assert_eq!(
        CostAttributes::from_description(&desc).default_time_attribute(),
        Some("A")
    );

    a.units = "Meters".into();
    b.units = "Meters".into();
    let desc = dataset("nd", vec![a, b]);
    assert_eq!(
        CostAttributes::from_description(&desc).default_distance_attribute(),
        Some("B")
    );
}

#[test]
fn flagged_distance_attribute_wins() {
    let desc = dataset(
        "nd",
        vec![distance_cost("Kilometers", true), distance_cost("Miles", false)],
    );
    let costs = CostAttributes::from_description(&desc);
    assert_eq!(costs.default_distance_attribute(), Some("Kilometers"));
}

// ── Properties ──────────────────────────────────────────────────

#[test]
fn simple_dataset_properties() {
    let props = network_properties(&simple_dataset()).unwrap();
    assert_eq!(props.dataset, "Streets_ND");
    assert_eq!(props.get("restrictions"), Some("Driving"));
    assert_eq!(props.get("default_restrictions"), Some("Driving"));
    assert_eq!(props.get("time_attribute"), Some("Minutes"));
    assert_eq!(props.get("time_attribute_units"), Some("Minutes"));
    assert_eq!(props.get("distance_attribute"), Some("Miles"));
    assert_eq!(props.get("non_walking_restrictions"), Some("Driving"));
    assert_eq!(props.get("walking_restriction"), Some(""));
    assert_eq!(props.get("time_neutral_attribute"), Some("Minutes"));
}

#[test]
fn named_time_attributes_are_preferred_for_walk_and_truck() {
    let mut desc = simple_dataset();
    desc.attributes.push(time_cost("WalkTime", false));
    desc.attributes.push(time_cost("TruckTravelTime", false));
    desc.attributes.push(restriction("Walking", false));
    desc.attributes.push(restriction("Driving a Truck", false));

    let props = network_properties(&desc).unwrap();
    assert_eq!(props.get("walk_time_attribute"), Some("WalkTime"));
    assert_eq!(props.get("truck_time_attribute"), Some("TruckTravelTime"));
    assert_eq!(props.get("walking_restriction"), Some("Walking"));
    assert_eq!(props.get("trucking_restriction"), Some("Driving a Truck"));
    assert_eq!(
        props.get("non_walking_restrictions"),
        Some("Driving;Driving a Truck")
    );
}

#[test]
fn locator_clause_skips_turn_sources() {
    let props = network_properties(&simple_dataset()).unwrap();
    assert_eq!(
        props.get("feature_locator_where_clause"),
        Some("\"Streets\" #;\"Streets_ND_Junctions\" #")
    );

    let mut sdc = simple_dataset();
    sdc.network_type = NetworkType::Sdc;
    let props = network_properties(&sdc).unwrap();
    assert_eq!(
        props.get("feature_locator_where_clause"),
        Some("\"SDC Edge Source\" #")
    );
}

#[test]
fn attribute_parameters_use_restriction_keywords() {
    let props = network_properties(&simple_dataset()).unwrap();
    let values: serde_json::Value =
        serde_json::from_str(props.get("attribute_parameter_values").unwrap()).unwrap();
    assert_eq!(values[0]["attributeName"], "Driving");
    assert_eq!(values[0]["value"], "PROHIBITED");
}

#[test]
fn travel_modes_are_keyed_by_type_and_impedance() {
    let mut desc = simple_dataset();
    desc.travel_modes.insert(
        "Driving Distance".into(),
        travel_mode("Miles", "Minutes", "Miles", &["Driving"]),
    );
    desc.travel_modes.insert(
        "Scooter".into(),
        travel_mode("Minutes", "Minutes", "Miles", &[]),
    );
    desc.travel_modes.insert(
        "Broken".into(),
        travel_mode("NoSuchCost", "Minutes", "Miles", &[]),
    );

    let props = network_properties(&desc).unwrap();
    let keys: serde_json::Value = serde_json::from_str(props.get("travel_modes").unwrap()).unwrap();
    let keys = keys.as_array().unwrap();
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().any(|k| k["travelModeType"] == "DRIVING"
        && k["isTimeBased"] == false
        && k["name"] == "DRIVING DISTANCE"));
    assert!(keys.iter().any(|k| k["travelModeType"] == "SCOOTER" && k["isTimeBased"] == true));
}

#[test]
fn custom_travel_mode_comes_from_driving_time() {
    let props = network_properties(&simple_dataset()).unwrap();
    let mode: serde_json::Value =
        serde_json::from_str(props.get("default_custom_travel_mode").unwrap()).unwrap();
    assert_eq!(mode["impedanceAttributeName"], "Minutes");

    let mut desc = simple_dataset();
    desc.travel_modes.clear();
    let props = network_properties(&desc).unwrap();
    assert_eq!(props.get("default_custom_travel_mode"), Some(""));
}

#[test]
fn dataset_without_time_cost_is_an_error() {
    let desc = dataset("nd", vec![distance_cost("Miles", true)]);
    assert!(matches!(
        network_properties(&desc),
        Err(SupportError::MissingCostAttribute { kind: "time", .. })
    ));
}
