//! `netpub`: publish network analysis routing services.
//!
//! Usage:
//!   netpub create-supporting-files --network-datasets "a;b" --output-folder DIR
//!   netpub publish-routing-services --network-datasets "a" --server-url URL \
//!       --server-data-folder-path PATH --output-folder DIR
//!
//! Exits with status 1 after logging the failure and its category.

use clap::Parser;
use netpub_cli::{Cli, Invocation, error_category, logging};
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let invocation = match Invocation::prepare(cli) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_file = invocation.log_file();
    if let Err(e) = logging::init(invocation.verbose(), log_file.as_deref()) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    match invocation.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match error_category(&e) {
                Some(category) => error!("{category}: {e:#}"),
                None => error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
