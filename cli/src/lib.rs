//! Argument parsing and command dispatch for the `netpub` binary.
//!
//! Parsing happens in two steps: [`Invocation::prepare`] merges the command
//! line with the optional configuration file and needs no logging, then
//! [`Invocation::execute`] runs the command once logging is installed.

pub mod logging;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use netpub_admin::{
    AdminClient, AdminError, FileHostSession, HostSession, SigninToken, StaticHostSession,
};
use netpub_publish::{
    CommandAnalysisEngine, CommandPackager, PublishConfig, PublishError, PublishRequest,
    RegistrationOutcome, RoutingServicePublisher, create_supporting_files,
};
use netpub_support::{ExportOptions, SupportError};
use netpub_types::{ErrorCategory, Password};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "netpub")]
#[command(about = "Publish network analysis routing services to a GIS server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the supporting files for one or more network datasets
    CreateSupportingFiles(SupportingFilesArgs),
    /// Publish the routing services and register them with the portal
    PublishRoutingServices(PublishArgs),
}

/// Options shared by both commands.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Network dataset catalog paths separated by `;`
    #[arg(long)]
    pub network_datasets: String,

    #[arg(long)]
    pub output_folder: PathBuf,

    /// Folder with per-locale travel mode translations
    #[arg(long)]
    pub localized_travel_modes_folder: Option<PathBuf>,

    /// Service limits as `Tool Limit Value;...`, `#` for no limit
    #[arg(long)]
    pub service_limits: Option<String>,

    /// Executable implementing the analysis engine protocol
    #[arg(long, env = "NETPUB_ENGINE_COMMAND")]
    pub engine_command: Option<PathBuf>,

    /// TOML file with publish settings; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging and keep intermediate files
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SupportingFilesArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub server_url: String,

    /// Server administrator; ignored for federated servers
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, env = "NETPUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// The data folder as the server sees it
    #[arg(long)]
    pub server_data_folder_path: String,

    /// Executable implementing the packaging protocol
    #[arg(long, env = "NETPUB_PACKAGER_COMMAND")]
    pub packager_command: Option<PathBuf>,

    #[command(flatten)]
    pub portal: PortalArgs,
}

/// The portal session of the publishing machine, for federated servers.
#[derive(Args, Debug, Clone, Default)]
pub struct PortalArgs {
    #[arg(long, env = "NETPUB_PORTAL_URL")]
    pub portal_url: Option<String>,

    #[arg(long, env = "NETPUB_PORTAL_TOKEN", hide_env_values = true)]
    pub portal_token: Option<String>,

    /// Token expiry in epoch seconds
    #[arg(long, env = "NETPUB_PORTAL_TOKEN_EXPIRES", default_value_t = 0)]
    pub portal_token_expires: i64,

    #[arg(long, env = "NETPUB_PORTAL_REFERER", default_value = "")]
    pub portal_referer: String,

    /// JSON session file the host rewrites when it renews its token
    #[arg(long, env = "NETPUB_PORTAL_SESSION_FILE")]
    pub portal_session_file: Option<PathBuf>,
}

impl PortalArgs {
    pub fn host_session(&self) -> Arc<dyn HostSession> {
        if let Some(path) = &self.portal_session_file {
            return Arc::new(FileHostSession::new(path));
        }
        match (&self.portal_url, &self.portal_token) {
            (Some(url), Some(token)) if !token.is_empty() => Arc::new(StaticHostSession::new(
                url.clone(),
                SigninToken {
                    token: token.clone(),
                    referer: self.portal_referer.clone(),
                    expires: self.portal_token_expires,
                },
            )),
            _ => Arc::new(StaticHostSession::signed_out()),
        }
    }
}

/// Splits a `;`-separated dataset list, stripping surrounding quotes and
/// dropping empty entries.
pub fn split_datasets(list: &str) -> Vec<String> {
    list.split(';')
        .map(|entry| entry.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the configuration file, or the defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<PublishConfig> {
    let Some(path) = path else {
        return Ok(PublishConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid configuration {}", path.display()))
}

impl CommonArgs {
    /// The configuration file with this command line applied on top.
    pub fn config(&self) -> Result<PublishConfig> {
        let mut config = load_config(self.config.as_deref())?;
        config.verbose |= self.verbose;
        if self.engine_command.is_some() {
            config.engine_command = self.engine_command.clone();
        }
        if self.service_limits.is_some() {
            config.service_limits = self.service_limits.clone();
        }
        if self.localized_travel_modes_folder.is_some() {
            config.localized_travel_modes_folder = self.localized_travel_modes_folder.clone();
        }
        Ok(config)
    }
}

fn engine_command(config: &PublishConfig) -> Result<PathBuf> {
    config.engine_command.clone().ok_or_else(|| {
        anyhow!("no analysis engine configured; pass --engine-command or set engine_command")
    })
}

fn packager_command(config: &PublishConfig) -> Result<PathBuf> {
    config.packager_command.clone().ok_or_else(|| {
        anyhow!("no packager configured; pass --packager-command or set packager_command")
    })
}

/// A parsed command, ready to run.
pub enum Invocation {
    SupportingFiles {
        network_datasets: Vec<String>,
        options: ExportOptions,
        engine_command: PathBuf,
        verbose: bool,
    },
    Publish {
        config: PublishConfig,
        request: PublishRequest,
        host: Arc<dyn HostSession>,
    },
}

impl Invocation {
    pub fn prepare(cli: Cli) -> Result<Self> {
        match cli.command {
            Command::CreateSupportingFiles(args) => {
                let config = args.common.config()?;
                Ok(Self::SupportingFiles {
                    network_datasets: split_datasets(&args.common.network_datasets),
                    engine_command: engine_command(&config)?,
                    options: ExportOptions {
                        output_folder: args.common.output_folder.clone(),
                        localized_travel_modes_folder: config.localized_travel_modes_folder,
                        service_limits: config.service_limits,
                    },
                    verbose: config.verbose,
                })
            }
            Command::PublishRoutingServices(args) => {
                let mut config = args.common.config()?;
                if args.packager_command.is_some() {
                    config.packager_command = args.packager_command.clone();
                }
                engine_command(&config)?;
                packager_command(&config)?;
                Ok(Self::Publish {
                    request: PublishRequest {
                        network_datasets: split_datasets(&args.common.network_datasets),
                        server_url: args.server_url.clone(),
                        username: args.username.clone(),
                        password: args.password.clone().map(Password::from),
                        server_data_folder_path: args.server_data_folder_path.clone(),
                        output_folder: args.common.output_folder.clone(),
                    },
                    host: args.portal.host_session(),
                    config,
                })
            }
        }
    }

    pub fn verbose(&self) -> bool {
        match self {
            Self::SupportingFiles { verbose, .. } => *verbose,
            Self::Publish { config, .. } => config.verbose,
        }
    }

    /// The publish command mirrors its log into the output folder.
    pub fn log_file(&self) -> Option<PathBuf> {
        match self {
            Self::SupportingFiles { .. } => None,
            Self::Publish { config, request, .. } => {
                Some(request.output_folder.join(&config.log_file_name))
            }
        }
    }

    pub async fn execute(self) -> Result<()> {
        match self {
            Self::SupportingFiles {
                network_datasets,
                options,
                engine_command,
                ..
            } => {
                let engine = CommandAnalysisEngine::new(engine_command);
                let files = create_supporting_files(&engine, &network_datasets, options).await?;
                info!("Network dataset properties: {}", files.properties.display());
                info!("Default travel modes: {}", files.travel_modes.display());
                if let Some(localized) = &files.localized_travel_modes {
                    info!("Localized travel modes: {}", localized.display());
                }
                info!("Tool info: {}", files.tool_info.display());
            }
            Self::Publish {
                config,
                request,
                host,
            } => {
                let client = AdminClient::new(config.admin.clone())?;
                let engine = Arc::new(CommandAnalysisEngine::new(engine_command(&config)?));
                let packager = Arc::new(CommandPackager::new(packager_command(&config)?));
                let report = RoutingServicePublisher::new(config, client, host, engine, packager)
                    .publish(&request)
                    .await?;
                info!(
                    "Published {} routing services ({})",
                    report.services.len(),
                    report.topology.label()
                );
                if let RegistrationOutcome::Configured { sharing_url, .. } = &report.registration {
                    info!("Configured the routing services as utility services in {sharing_url}");
                }
            }
        }
        Ok(())
    }
}

/// The category of a failure that came out of the publishing crates.
pub fn error_category(error: &anyhow::Error) -> Option<ErrorCategory> {
    if let Some(e) = error.downcast_ref::<PublishError>() {
        return Some(e.category());
    }
    if let Some(e) = error.downcast_ref::<AdminError>() {
        return Some(e.category());
    }
    error.downcast_ref::<SupportError>().map(SupportError::category)
}
