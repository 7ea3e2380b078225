//! Uploading service definition packages and running the publishing job.

use crate::client::{ensure_success, messages};
use crate::error::{AdminError, AdminResult};
use crate::session::AdminSession;
use netpub_types::ServiceIdentity;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const PUBLISH_TOOL: &str = "System/PublishingTools/GPServer/Publish Service Definition";

/// State of a publishing job as reported by `jobs/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Succeeded,
    Failed,
    Cancelled,
    TimedOut,
    Deleted,
    /// New, submitted, waiting, executing, cancelling, or deleting.
    Running,
}

impl JobStatus {
    /// Maps a `jobStatus` value. Unknown values yield `None`.
    pub fn parse(status: &str) -> Option<Self> {
        let parsed = match status {
            "esriJobSucceeded" => Self::Succeeded,
            "esriJobFailed" => Self::Failed,
            "esriJobCancelled" => Self::Cancelled,
            "esriJobTimedOut" => Self::TimedOut,
            "esriJobDeleted" => Self::Deleted,
            "esriJobNew" | "esriJobSubmitted" | "esriJobWaiting" | "esriJobExecuting"
            | "esriJobCancelling" | "esriJobDeleting" => Self::Running,
            _ => return None,
        };
        Some(parsed)
    }
}

fn publish_tool_url(session: &AdminSession) -> String {
    let encoded: Vec<String> = PUBLISH_TOOL
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    session.rest_services_url(&encoded.join("/"))
}

impl AdminSession {
    /// Uploads a staged package and returns the uploaded item id.
    pub async fn upload_package(&self, package: &Path) -> AdminResult<String> {
        let bytes = tokio::fs::read(package).await?;
        let file_name = package
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "service.sd".to_string());
        debug!("Uploading {} ({} bytes)", package.display(), bytes.len());

        let part = Part::bytes(bytes).file_name(file_name);
        let form = Form::new()
            .part("itemFile", part)
            .text("description", "network analysis service definition");

        let url = self.admin_url("uploads/upload");
        let response = self
            .client()
            .post_multipart(&url, self.credential(), form)
            .await?;
        ensure_success(&url, &response)?;
        response
            .pointer("/item/itemID")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AdminError::invalid_response(&url, "upload returned no item id"))
    }

    /// Runs the publishing tool on an uploaded package and waits for it
    /// to finish.
    pub async fn publish_uploaded_item(&self, item_id: &str) -> AdminResult<()> {
        let tool = publish_tool_url(self);
        let submit_url = format!("{tool}/submitJob");
        let submitted = self.post(&submit_url, &[("in_sdp_id", item_id)]).await?;
        let job_id = submitted
            .get("jobId")
            .and_then(Value::as_str)
            .ok_or_else(|| AdminError::invalid_response(&submit_url, "no job id"))?
            .to_string();
        debug!("Publishing job {job_id} submitted");

        let interval = Duration::from_millis(self.client().config().job_poll_interval_ms);
        let job_url = format!("{tool}/jobs/{job_id}");
        loop {
            let job = self.get(&job_url, &[]).await?;
            let status = job
                .get("jobStatus")
                .and_then(Value::as_str)
                .ok_or_else(|| AdminError::invalid_response(&job_url, "job has no status"))?;
            let parsed = JobStatus::parse(status).ok_or_else(|| {
                AdminError::invalid_response(&job_url, format!("unknown job status '{status}'"))
            })?;
            match parsed {
                JobStatus::Succeeded => return Ok(()),
                JobStatus::Running => tokio::time::sleep(interval).await,
                _ => {
                    return Err(AdminError::PublishJobFailed {
                        job_id,
                        status: status.to_string(),
                        message: messages(job.get("messages")),
                    });
                }
            }
        }
    }

    /// Uploads and publishes a package into `folder`, returning the
    /// server-direct REST URL of the new service.
    pub async fn publish_package(
        &self,
        package: &Path,
        folder: &str,
        identity: &ServiceIdentity,
    ) -> AdminResult<String> {
        let item_id = self.upload_package(package).await?;
        self.publish_uploaded_item(&item_id).await?;
        let url = self.rest_services_url(&format!(
            "{folder}/{}/{}",
            identity.name, identity.service_type
        ));
        info!("Published {identity} at {url}");
        Ok(url)
    }
}
