use netpub_types::{ServiceEndpoints, UtilityRole, UtilityServiceBinding};
use pretty_assertions::assert_eq;

fn endpoints() -> ServiceEndpoints {
    ServiceEndpoints {
        map_service: "https://portal/server/rest/services/Routing/NetworkAnalysis/MapServer".into(),
        na_server: "https://portal/server/rest/services/Routing/NetworkAnalysis/NAServer".into(),
        main_gp: "https://portal/server/rest/services/Routing/NetworkAnalysis/GPServer".into(),
        sync_vrp_gp: "https://portal/server/rest/services/Routing/NetworkAnalysisSync/GPServer"
            .into(),
        utilities_gp:
            "https://portal/server/rest/services/Routing/NetworkAnalysisUtilities/GPServer".into(),
    }
}

#[test]
fn binding_covers_all_eleven_roles() {
    let binding = UtilityServiceBinding::from_endpoints(&endpoints());
    assert_eq!(binding.len(), 11);
    for role in UtilityRole::ALL {
        assert!(binding.url(role).is_some(), "missing {role:?}");
    }
}

#[test]
fn sync_roles_point_at_na_server_layers() {
    let binding = UtilityServiceBinding::from_endpoints(&endpoints());
    assert_eq!(
        binding.url(UtilityRole::ClosestFacility),
        Some("https://portal/server/rest/services/Routing/NetworkAnalysis/NAServer/ClosestFacility")
    );
    assert_eq!(
        binding.url(UtilityRole::RouteServiceLayer),
        Some("https://portal/server/rest/services/Routing/NetworkAnalysis/NAServer/Route")
    );
    assert_eq!(
        binding.url(UtilityRole::ServiceArea),
        Some("https://portal/server/rest/services/Routing/NetworkAnalysis/NAServer/ServiceArea")
    );
}

#[test]
fn async_roles_point_at_main_gp_tasks() {
    let binding = UtilityServiceBinding::from_endpoints(&endpoints());
    let main = endpoints().main_gp;
    assert_eq!(
        binding.url(UtilityRole::AsyncClosestFacility).unwrap(),
        format!("{main}/FindClosestFacilities")
    );
    assert_eq!(
        binding.url(UtilityRole::AsyncVrp).unwrap(),
        format!("{main}/SolveVehicleRoutingProblem")
    );
    assert_eq!(binding.url(UtilityRole::AsyncRoute).unwrap(), main);
    assert_eq!(binding.url(UtilityRole::AsyncLocationAllocation).unwrap(), main);
}

#[test]
fn sync_vrp_traffic_and_utilities() {
    let binding = UtilityServiceBinding::from_endpoints(&endpoints());
    let ep = endpoints();
    assert_eq!(
        binding.url(UtilityRole::SyncVrp).unwrap(),
        format!("{}/EditVehicleRoutingProblem", ep.sync_vrp_gp)
    );
    assert_eq!(binding.url(UtilityRole::Traffic).unwrap(), ep.map_service);
    assert_eq!(binding.url(UtilityRole::RoutingUtilities).unwrap(), ep.utilities_gp);
}

#[test]
fn portal_params_wrap_urls_in_json() {
    let binding = UtilityServiceBinding::from_endpoints(&endpoints());
    let params = binding.to_portal_params();
    assert_eq!(params.len(), 11);

    let (_, traffic) = params
        .iter()
        .find(|(key, _)| key == "trafficService")
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(traffic).unwrap();
    assert_eq!(value["url"], endpoints().map_service);
}
