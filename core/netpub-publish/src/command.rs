//! JSON-over-stdio protocol shared by the process-backed collaborators.
//!
//! The executable is run as `<program> <subcommand>`, receives one JSON
//! request on stdin, and must print one JSON document on stdout. A non-zero
//! exit status fails the call with the captured stderr.

use crate::error::{PublishError, PublishResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

pub(crate) async fn run_json<Req, Resp>(
    program: &Path,
    subcommand: &str,
    request: &Req,
) -> PublishResult<Resp>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let command_line = format!("{} {subcommand}", program.display());
    let failed = |message: String| PublishError::Collaborator {
        command: command_line.clone(),
        message,
    };

    let body = serde_json::to_vec(request)?;
    debug!("Running {command_line}");
    let mut child = Command::new(program)
        .arg(subcommand)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| failed(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(&body)
            .await
            .map_err(|e| failed(format!("writing request: {e}")))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| failed(e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failed(format!("{}: {}", output.status, stderr.trim())));
    }

    serde_json::from_slice(&output.stdout).map_err(|e| {
        failed(format!(
            "unreadable output ({e}): {}",
            String::from_utf8_lossy(&output.stdout).trim()
        ))
    })
}
