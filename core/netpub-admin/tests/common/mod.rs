//! Shared test helpers for admin client tests.

#![allow(dead_code)]

use netpub_admin::{
    AdminClient, AdminClientConfig, AdminSession, HostSession, SigninToken, StaticHostSession,
    TopologyResolver,
};
use netpub_types::Password;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Far-future expiry in epoch milliseconds.
pub const FAR_FUTURE_MS: i64 = 4_102_444_800_000;

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

pub fn portal_url(server: &MockServer) -> String {
    format!("{}/portal", server.uri())
}

pub async fn mount_info(server: &MockServer, owning_system: Option<&str>) {
    let body = match owning_system {
        Some(url) => json!({"currentVersion": 11.3, "owningSystemUrl": url}),
        None => json!({"currentVersion": 11.3}),
    };
    Mock::given(method("GET"))
        .and(path("/server/rest/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/server/admin/generateToken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": token, "expires": FAR_FUTURE_MS})),
        )
        .mount(server)
        .await;
}

pub async fn mount_admin_info(server: &MockServer, user: &str, privilege: &str) {
    Mock::given(method("GET"))
        .and(path("/server/admin/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "loggedInUser": user,
            "loggedInUserPrivilege": privilege,
        })))
        .mount(server)
        .await;
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

/// A verified session against a stand-alone mock server.
pub async fn standalone_session(server: &MockServer) -> AdminSession {
    mount_info(server, None).await;
    mount_token(server, "server-token").await;
    mount_admin_info(server, "builtin::siteadmin", "ADMINISTER").await;

    let resolver = TopologyResolver::new(test_client(), Arc::new(StaticHostSession::signed_out()));
    resolver
        .resolve(
            &server_url(server),
            Some("siteadmin"),
            Some(&Password::from("secret")),
        )
        .await
        .unwrap()
}

/// A verified session against a mock server federated with a mock portal
/// served from the same address.
pub async fn federated_session(server: &MockServer) -> AdminSession {
    let portal = portal_url(server);
    mount_info(server, Some(&portal)).await;
    mount_admin_info(server, "portal::gisadmin", "ADMINISTER").await;

    let resolver = TopologyResolver::new(test_client(), signed_in_host(&portal));
    resolver
        .resolve(&server_url(server), None, None)
        .await
        .unwrap()
}
