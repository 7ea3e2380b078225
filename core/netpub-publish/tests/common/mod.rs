//! Shared fakes and mock server helpers for publish workflow tests.

#![allow(dead_code)]

use async_trait::async_trait;
use netpub_admin::{
    AdminClient, AdminClientConfig, AdminSession, HostSession, SigninToken, StaticHostSession,
    TopologyResolver,
};
use netpub_publish::{
    AnalysisArtifact, AnalysisEngine, AnalyzerReport, DraftRequest, Packager, PublishResult,
    ServiceDefinitionDraft, SolverKind, StageRequest, StagedPackage, ToolRun,
};
use netpub_types::{
    AttributeParameter, Extent, NetworkAttribute, NetworkDatasetDescription, NetworkType,
    Password, ServiceKind, TrafficInfo, UsageType,
};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FAR_FUTURE_MS: i64 = 4_102_444_800_000;
pub const PUBLISH_TOOL: &str =
    "/server/rest/services/System/PublishingTools/GPServer/Publish%20Service%20Definition";
/// Nothing listens here.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SVCManifest>
  <Configurations>
    <SVCConfiguration>
      <Definition>
        <Extensions>
          <SVCExtension><Enabled>true</Enabled><TypeName>KmlServer</TypeName></SVCExtension>
          <SVCExtension><Enabled>false</Enabled><TypeName>NAServer</TypeName></SVCExtension>
        </Extensions>
      </Definition>
    </SVCConfiguration>
  </Configurations>
</SVCManifest>"#;

// ── Datasets ────────────────────────────────────────────────────

fn attribute(name: &str, usage_type: UsageType, units: &str, default: bool) -> NetworkAttribute {
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

/// "Minutes" time cost used by default, "Miles", and a default "Driving"
/// restriction, stored in `/data/routing/streets.gdb`.
pub fn streets_dataset(name: &str) -> NetworkDatasetDescription {
    let mut driving = attribute("Driving", UsageType::Restriction, "Unknown", true);
    driving.data_type = "Boolean".into();
    driving.parameters.push(AttributeParameter {
        name: "Restriction Usage".into(),
        data_type: "Double".into(),
        usage_type: Some("Restriction".into()),
        default_value: Some("-1.0".into()),
    });

    let mut travel_modes = BTreeMap::new();
    travel_modes.insert(
        "Driving Time".to_string(),
        json!({
            "impedanceAttributeName": "Minutes",
            "timeAttributeName": "Minutes",
            "distanceAttributeName": "Miles",
            "restrictionAttributeNames": ["Driving"],
            "attributeParameterValues": [
                {"attributeName": "Driving", "parameterName": "Restriction Usage", "value": -1.0}
            ]
        }),
    );

    NetworkDatasetDescription {
        name: name.into(),
        catalog_path: format!("/data/routing/streets.gdb/Transportation/{name}").into(),
        network_type: NetworkType::Geodatabase,
        attributes: vec![
            attribute("Minutes", UsageType::Cost, "Minutes", true),
            attribute("Miles", UsageType::Cost, "Miles", false),
            driving,
        ],
        sources: vec!["Streets".into(), "Streets_ND_Junctions".into()],
        turn_sources: Vec::new(),
        extent: Extent {
            xmin: -122.5,
            ymin: 37.7,
            xmax: -122.3,
            ymax: 37.8,
        },
        travel_modes,
        default_travel_mode_name: None,
        traffic: TrafficInfo::default(),
    }
}

// ── Collaborator fakes ──────────────────────────────────────────

/// Describes every dataset as [`streets_dataset`] and records each call.
#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisEngine for RecordingEngine {
    async fn describe(&self, dataset: &str) -> PublishResult<NetworkDatasetDescription> {
        self.calls.lock().unwrap().push(format!("describe {dataset}"));
        let name = dataset.rsplit('/').next().unwrap_or(dataset);
        Ok(streets_dataset(name))
    }

    async fn make_analysis_layer(
        &self,
        _dataset: &NetworkDatasetDescription,
        solver: SolverKind,
        cost_attribute: &str,
    ) -> PublishResult<AnalysisArtifact> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("layer {} {cost_attribute}", solver.layer_name()));
        Ok(AnalysisArtifact {
            name: solver.layer_name().into(),
            path: format!("/layers/{}.lyr", solver.layer_name()).into(),
        })
    }

    async fn run_tool(&self, run: &ToolRun) -> PublishResult<AnalysisArtifact> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("tool {}", run.tool.name()));
        Ok(AnalysisArtifact {
            name: run.tool.name().into(),
            path: format!("/results/{}", run.tool.name()).into(),
        })
    }
}

/// Writes [`MANIFEST`] as every draft and a placeholder package when
/// staging. Analyzer reports can be set per service kind.
#[derive(Default)]
pub struct RecordingPackager {
    pub reports: HashMap<ServiceKind, AnalyzerReport>,
    pub drafts: Mutex<Vec<DraftRequest>>,
    pub staged: Mutex<Vec<StagedPackage>>,
}

impl RecordingPackager {
    pub fn with_report(kind: ServiceKind, report: AnalyzerReport) -> Self {
        let mut packager = Self::default();
        packager.reports.insert(kind, report);
        packager
    }

    pub fn drafts(&self) -> Vec<DraftRequest> {
        self.drafts.lock().unwrap().clone()
    }

    pub fn staged(&self) -> Vec<StagedPackage> {
        self.staged.lock().unwrap().clone()
    }
}

#[async_trait]
impl Packager for RecordingPackager {
    async fn create_draft(&self, request: &DraftRequest) -> PublishResult<ServiceDefinitionDraft> {
        std::fs::write(&request.draft_path, MANIFEST)?;
        self.drafts.lock().unwrap().push(request.clone());
        let report = self.reports.get(&request.kind).cloned().unwrap_or_default();
        ServiceDefinitionDraft::load(request.kind, &request.draft_path, report)
    }

    async fn stage(
        &self,
        draft: &ServiceDefinitionDraft,
        request: &StageRequest,
    ) -> PublishResult<StagedPackage> {
        std::fs::write(&request.package_path, draft.to_xml()?)?;
        let package = StagedPackage {
            kind: draft.kind(),
            path: request.package_path.clone(),
        };
        self.staged.lock().unwrap().push(package.clone());
        Ok(package)
    }
}

// ── Log capture ─────────────────────────────────────────────────

/// Records the level and message of every event.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LogCapture {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(event_level, _)| *event_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

// ── Admin mocks ─────────────────────────────────────────────────

pub fn test_client() -> AdminClient {
    AdminClient::new(AdminClientConfig {
        job_poll_interval_ms: 1,
        ..Default::default()
    })
    .unwrap()
}

pub fn server_url(server: &MockServer) -> String {
    format!("{}/server", server.uri())
}

pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_post(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Info, token, and admin info for a standalone server.
pub async fn mount_standalone(server: &MockServer) {
    mount_get(server, "/server/rest/info", json!({"currentVersion": 11.3})).await;
    mount_post(
        server,
        "/server/admin/generateToken",
        json!({"token": "server-token", "expires": FAR_FUTURE_MS}),
    )
    .await;
    mount_get(
        server,
        "/server/admin/info",
        json!({"loggedInUser": "builtin::siteadmin", "loggedInUserPrivilege": "ADMINISTER"}),
    )
    .await;
}

/// Info and admin info for a server federated with `portal`.
pub async fn mount_federated(server: &MockServer, portal: &str) {
    mount_get(
        server,
        "/server/rest/info",
        json!({"currentVersion": 11.3, "owningSystemUrl": portal}),
    )
    .await;
    mount_get(
        server,
        "/server/admin/info",
        json!({"loggedInUser": "portal::gisadmin", "loggedInUserPrivilege": "ADMINISTER"}),
    )
    .await;
}

/// An empty server: no routing folder, no data store items, and a
/// publishing tool whose jobs succeed at once.
pub async fn mount_empty_server(server: &MockServer) {
    mount_get(server, "/server/admin/services", json!({"folders": ["System"]})).await;
    mount_post(server, "/server/admin/services/createFolder", json!({"status": "success"})).await;
    mount_post(server, "/server/admin/data/findItems", json!({"items": []})).await;
    mount_post(server, "/server/admin/data/registerItem", json!({"status": "success"})).await;
    mount_publishing(server).await;
}

pub async fn mount_publishing(server: &MockServer) {
    mount_post(
        server,
        "/server/admin/uploads/upload",
        json!({"status": "success", "item": {"itemID": "upload1"}}),
    )
    .await;
    mount_post(
        server,
        &format!("{PUBLISH_TOOL}/submitJob"),
        json!({"jobId": "j1", "jobStatus": "esriJobSubmitted"}),
    )
    .await;
    mount_get(
        server,
        &format!("{PUBLISH_TOOL}/jobs/j1"),
        json!({"jobId": "j1", "jobStatus": "esriJobSucceeded"}),
    )
    .await;
}

/// Portal items of the four published services.
pub async fn mount_portal_items(server: &MockServer) {
    let services = [
        ("NetworkAnalysis.MapServer", json!([
            {"itemID": "map1", "type": "MapServer"},
            {"itemID": "na1", "type": "NAServer"}
        ])),
        ("NetworkAnalysisUtilities.GPServer", json!([{"itemID": "util1", "type": "GPServer"}])),
        ("NetworkAnalysis.GPServer", json!([{"itemID": "gp1", "type": "GPServer"}])),
        ("NetworkAnalysisSync.GPServer", json!([{"itemID": "sync1", "type": "GPServer"}])),
    ];
    for (service, items) in services {
        mount_get(
            server,
            &format!("/server/admin/services/Routing/{service}"),
            json!({"portalProperties": {"portalItems": items}}),
        )
        .await;
    }
}

/// The sharing API of a portal served under `prefix` on the mock server.
pub async fn mount_sharing(server: &MockServer, prefix: &str) {
    mount_get(server, &format!("{prefix}/sharing/rest/"), json!({"currentVersion": "11.3"})).await;
    mount_post(
        server,
        &format!("{prefix}/sharing/rest/content/users/gisadmin/shareItems"),
        json!({"results": [{"itemId": "map1", "success": true}]}),
    )
    .await;
    let urls = [
        ("map1", "NetworkAnalysis/MapServer"),
        ("na1", "NetworkAnalysis/NAServer"),
        ("gp1", "NetworkAnalysis/GPServer"),
        ("sync1", "NetworkAnalysisSync/GPServer"),
        ("util1", "NetworkAnalysisUtilities/GPServer"),
    ];
    for (item, service) in urls {
        mount_get(
            server,
            &format!("{prefix}/sharing/rest/content/users/gisadmin/items/{item}"),
            json!({"item": {"id": item, "url": format!("https://web.example.com/server/rest/services/Routing/{service}")}}),
        )
        .await;
    }
}

pub fn signed_in_host(portal: &str) -> Arc<dyn HostSession> {
    Arc::new(StaticHostSession::new(
        portal,
        SigninToken {
            token: "portal-token".to_string(),
            referer: "netpub".to_string(),
            expires: 4_102_444_800,
        },
    ))
}

pub fn signed_out_host() -> Arc<dyn HostSession> {
    Arc::new(StaticHostSession::signed_out())
}

pub async fn standalone_session(server: &MockServer) -> AdminSession {
    mount_standalone(server).await;
    TopologyResolver::new(test_client(), signed_out_host())
        .resolve(
            &server_url(server),
            Some("siteadmin"),
            Some(&Password::from("secret")),
        )
        .await
        .unwrap()
}
