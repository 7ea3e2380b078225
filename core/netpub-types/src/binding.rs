//! Utility-service roles written to the portal configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A portal-wide default endpoint used by client applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UtilityRole {
    AsyncClosestFacility,
    AsyncLocationAllocation,
    AsyncRoute,
    AsyncServiceArea,
    SyncVrp,
    AsyncVrp,
    ClosestFacility,
    RouteServiceLayer,
    RoutingUtilities,
    ServiceArea,
    Traffic,
}

impl UtilityRole {
    pub const ALL: [UtilityRole; 11] = [
        UtilityRole::AsyncClosestFacility,
        UtilityRole::AsyncLocationAllocation,
        UtilityRole::AsyncRoute,
        UtilityRole::AsyncServiceArea,
        UtilityRole::SyncVrp,
        UtilityRole::AsyncVrp,
        UtilityRole::ClosestFacility,
        UtilityRole::RouteServiceLayer,
        UtilityRole::RoutingUtilities,
        UtilityRole::ServiceArea,
        UtilityRole::Traffic,
    ];

    /// Parameter name accepted by `portals/self/update`.
    pub fn portal_key(&self) -> &'static str {
        match self {
            Self::AsyncClosestFacility => "asyncClosestFacilityService",
            Self::AsyncLocationAllocation => "asyncLocationAllocationService",
            Self::AsyncRoute => "asyncRouteService",
            Self::AsyncServiceArea => "asyncServiceAreaService",
            Self::SyncVrp => "syncVRPService",
            Self::AsyncVrp => "asyncVRPService",
            Self::ClosestFacility => "closestFacilityService",
            Self::RouteServiceLayer => "routeServiceLayer",
            Self::RoutingUtilities => "routingUtilitiesService",
            Self::ServiceArea => "serviceAreaService",
            Self::Traffic => "trafficService",
        }
    }
}

/// Portal-relative URLs of the published services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub map_service: String,
    pub na_server: String,
    pub main_gp: String,
    pub sync_vrp_gp: String,
    pub utilities_gp: String,
}

/// Maps every utility role to the URL that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityServiceBinding {
    urls: BTreeMap<UtilityRole, String>,
}

impl UtilityServiceBinding {
    /// Composes the eleven role URLs from the service endpoints.
    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Self {
        let urls = UtilityRole::ALL
            .iter()
            .map(|role| {
                let url = match role {
                    UtilityRole::AsyncClosestFacility => {
                        format!("{}/FindClosestFacilities", endpoints.main_gp)
                    }
                    UtilityRole::AsyncServiceArea => {
                        format!("{}/GenerateServiceAreas", endpoints.main_gp)
                    }
                    UtilityRole::AsyncVrp => {
                        format!("{}/SolveVehicleRoutingProblem", endpoints.main_gp)
                    }
                    UtilityRole::AsyncRoute | UtilityRole::AsyncLocationAllocation => {
                        endpoints.main_gp.clone()
                    }
                    UtilityRole::SyncVrp => {
                        format!("{}/EditVehicleRoutingProblem", endpoints.sync_vrp_gp)
                    }
                    UtilityRole::ClosestFacility => {
                        format!("{}/ClosestFacility", endpoints.na_server)
                    }
                    UtilityRole::ServiceArea => format!("{}/ServiceArea", endpoints.na_server),
                    UtilityRole::RouteServiceLayer => format!("{}/Route", endpoints.na_server),
                    UtilityRole::RoutingUtilities => endpoints.utilities_gp.clone(),
                    UtilityRole::Traffic => endpoints.map_service.clone(),
                };
                (*role, url)
            })
            .collect();
        Self { urls }
    }

    pub fn url(&self, role: UtilityRole) -> Option<&str> {
        self.urls.get(&role).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UtilityRole, &str)> {
        self.urls.iter().map(|(role, url)| (*role, url.as_str()))
    }

    /// Form parameters for `portals/self/update`; each value is `{"url": ...}`.
    pub fn to_portal_params(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(role, url)| {
                (
                    role.portal_key().to_string(),
                    serde_json::json!({ "url": url }).to_string(),
                )
            })
            .collect()
    }
}
