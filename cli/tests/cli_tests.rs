use clap::Parser;
use netpub_admin::HostSession;
use netpub_cli::{Cli, Invocation, PortalArgs, error_category, load_config, split_datasets};
use netpub_publish::PublishError;
use netpub_types::ErrorCategory;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn prepare(args: &[&str]) -> anyhow::Result<Invocation> {
    Invocation::prepare(Cli::try_parse_from(args).unwrap())
}

const PUBLISH: &[&str] = &[
    "netpub",
    "publish-routing-services",
    "--network-datasets",
    "\"/data/streets.gdb/Transportation/Streets_ND\"",
    "--server-url",
    "https://gis.example.com/server",
    "--username",
    "siteadmin",
    "--password",
    "secret",
    "--server-data-folder-path",
    "/srv/gis/routing",
    "--output-folder",
    "/tmp/out",
    "--engine-command",
    "/opt/netpub/engine",
    "--packager-command",
    "/opt/netpub/packager",
];

// ── Dataset lists ───────────────────────────────────────────────

#[test]
fn dataset_lists_are_split_and_unquoted() {
    assert_eq!(
        split_datasets("\"/data/a.gdb/T/A_ND\"; '/data/b.gdb/T/B_ND' ;;/data/c_ND"),
        vec!["/data/a.gdb/T/A_ND", "/data/b.gdb/T/B_ND", "/data/c_ND"]
    );
    assert!(split_datasets(" ; ").is_empty());
}

// ── Argument parsing ────────────────────────────────────────────

#[test]
fn publish_arguments_become_a_request() {
    let Invocation::Publish { config, request, .. } = prepare(PUBLISH).unwrap() else {
        panic!("expected a publish invocation");
    };
    assert_eq!(
        request.network_datasets,
        vec!["/data/streets.gdb/Transportation/Streets_ND"]
    );
    assert_eq!(request.server_url, "https://gis.example.com/server");
    assert_eq!(request.username.as_deref(), Some("siteadmin"));
    assert_eq!(request.password.unwrap().expose(), "secret");
    assert_eq!(request.output_folder, PathBuf::from("/tmp/out"));
    assert_eq!(config.engine_command, Some(PathBuf::from("/opt/netpub/engine")));
    assert_eq!(config.folder_name, "Routing");
    assert!(!config.verbose);
}

#[test]
fn publish_logs_into_the_output_folder() {
    let mut args = PUBLISH.to_vec();
    args.push("--verbose");
    let invocation = prepare(&args).unwrap();
    assert!(invocation.verbose());
    assert_eq!(
        invocation.log_file(),
        Some(PathBuf::from("/tmp/out/PublishRoutingServices.log"))
    );
}

#[test]
fn supporting_files_take_the_limits_from_the_command_line() {
    let invocation = prepare(&[
        "netpub",
        "create-supporting-files",
        "--network-datasets",
        "/data/a_ND;/data/b_ND",
        "--output-folder",
        "/tmp/out",
        "--service-limits",
        "FindRoutes maximumStops 150",
        "--engine-command",
        "/opt/netpub/engine",
    ])
    .unwrap();
    assert_eq!(invocation.log_file(), None);
    let Invocation::SupportingFiles {
        network_datasets,
        options,
        engine_command,
        verbose,
    } = invocation
    else {
        panic!("expected a supporting files invocation");
    };
    assert_eq!(network_datasets, vec!["/data/a_ND", "/data/b_ND"]);
    assert_eq!(options.output_folder, PathBuf::from("/tmp/out"));
    assert_eq!(options.service_limits.as_deref(), Some("FindRoutes maximumStops 150"));
    assert_eq!(engine_command, PathBuf::from("/opt/netpub/engine"));
    assert!(!verbose);
}

#[test]
fn missing_required_arguments_are_rejected() {
    assert!(Cli::try_parse_from(["netpub", "publish-routing-services"]).is_err());
    assert!(
        Cli::try_parse_from([
            "netpub",
            "create-supporting-files",
            "--network-datasets",
            "/data/a_ND"
        ])
        .is_err()
    );
}

#[test]
fn publish_needs_a_packager() {
    let args: Vec<&str> = PUBLISH
        .iter()
        .copied()
        .filter(|arg| !arg.contains("packager"))
        .collect();
    let Err(err) = prepare(&args) else {
        panic!("expected an error");
    };
    assert!(err.to_string().contains("--packager-command"));
}

// ── Configuration file ──────────────────────────────────────────

#[test]
fn config_file_values_are_overridden_by_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("netpub.toml");
    std::fs::write(
        &path,
        r#"
folder_name = "NetworkAnalysis"
engine_command = "/usr/local/bin/engine"
packager_command = "/usr/local/bin/packager"
verbose = true

[admin]
accept_invalid_admin_certs = false
"#,
    )
    .unwrap();
    let config_arg = path.to_string_lossy().into_owned();

    let args: Vec<&str> = PUBLISH
        .iter()
        .copied()
        .filter(|arg| !arg.contains("/opt/netpub/packager") && *arg != "--packager-command")
        .chain(["--config", config_arg.as_str()])
        .collect();
    let Invocation::Publish { config, .. } = prepare(&args).unwrap() else {
        panic!("expected a publish invocation");
    };
    assert_eq!(config.folder_name, "NetworkAnalysis");
    assert_eq!(config.engine_command, Some(PathBuf::from("/opt/netpub/engine")));
    assert_eq!(
        config.packager_command,
        Some(PathBuf::from("/usr/local/bin/packager"))
    );
    assert!(config.verbose);
    assert!(!config.admin.accept_invalid_admin_certs);
    assert_eq!(config.data_store_item_name, "RoutingData");
}

#[test]
fn unreadable_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "folder_name = [").unwrap();
    assert!(load_config(Some(&path)).is_err());
    assert!(load_config(Some(Path::new("/nonexistent/netpub.toml"))).is_err());
    assert_eq!(load_config(None).unwrap().folder_name, "Routing");
}

// ── Portal session ──────────────────────────────────────────────

#[tokio::test]
async fn portal_flags_build_a_signed_in_session() {
    let portal = PortalArgs {
        portal_url: Some("https://gis.example.com/portal".into()),
        portal_token: Some("portal-token".into()),
        portal_token_expires: 4_102_444_800,
        portal_referer: "netpub".into(),
        portal_session_file: None,
    };
    let host = portal.host_session();
    assert_eq!(
        host.active_portal_url().await.as_deref(),
        Some("https://gis.example.com/portal")
    );
    assert_eq!(host.signin_token().await.unwrap().token, "portal-token");
}

#[tokio::test]
async fn no_portal_token_means_signed_out() {
    let portal = PortalArgs {
        portal_url: Some("https://gis.example.com/portal".into()),
        ..Default::default()
    };
    let host = portal.host_session();
    assert!(host.active_portal_url().await.is_none());
    assert!(host.signin_token().await.is_none());
}

// ── Error reporting ─────────────────────────────────────────────

#[test]
fn publish_errors_keep_their_category() {
    let err = anyhow::Error::from(PublishError::InvalidDataset("Streets_ND".into()));
    assert_eq!(error_category(&err), Some(ErrorCategory::Configuration));
    assert_eq!(error_category(&anyhow::anyhow!("plain failure")), None);
}
