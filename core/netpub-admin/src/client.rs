//! HTTP plumbing shared by every admin and sharing call.
//!
//! Two reqwest clients are kept: one that always verifies certificates,
//! used for the public info probe, and one that follows the configured
//! admin policy for everything else.

use crate::config::AdminClientConfig;
use crate::error::{AdminError, AdminResult};
use netpub_types::AdminCredential;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::error::Error;
use std::time::Duration;
use tracing::debug;

/// Thin wrapper around reqwest that speaks the server's JSON conventions.
#[derive(Clone)]
pub struct AdminClient {
    config: AdminClientConfig,
    strict: Client,
    admin: Client,
}

impl AdminClient {
    /// Builds both HTTP clients.
    pub fn new(config: AdminClientConfig) -> AdminResult<Self> {
        let strict = Self::builder(&config)
            .build()
            .map_err(|e| AdminError::Transport {
                endpoint: "client".to_string(),
                message: format!("failed to create HTTP client: {e}"),
            })?;
        let admin = Self::builder(&config)
            .danger_accept_invalid_certs(config.accept_invalid_admin_certs)
            .build()
            .map_err(|e| AdminError::Transport {
                endpoint: "client".to_string(),
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            config,
            strict,
            admin,
        })
    }

    fn builder(config: &AdminClientConfig) -> reqwest::ClientBuilder {
        let builder = Client::builder().user_agent(config.user_agent.clone());
        match config.request_timeout_secs {
            Some(secs) => builder.timeout(Duration::from_secs(secs)),
            None => builder,
        }
    }

    pub fn config(&self) -> &AdminClientConfig {
        &self.config
    }

    /// Unauthenticated GET with certificate verification. Used only for
    /// the server's public info endpoint.
    pub async fn get_public(&self, url: &str) -> AdminResult<Value> {
        debug!("GET {url} (verified)");
        let request = self.strict.get(url).query(&[("f", "json")]);
        let response = send(url, request).await?;
        read_json(url, response).await
    }

    /// Authenticated GET; fails on any non-success status in the body.
    pub async fn get_json(
        &self,
        url: &str,
        credential: &AdminCredential,
        params: &[(&str, &str)],
    ) -> AdminResult<Value> {
        debug!("GET {url}");
        let request = authorize(self.admin.get(url), credential)
            .query(&credential.query_pairs())
            .query(params);
        let response = send(url, request).await?;
        let value = read_json(url, response).await?;
        ensure_not_failed(url, &value)?;
        Ok(value)
    }

    /// Authenticated form POST; fails on any non-success status in the body.
    pub async fn post_form(
        &self,
        url: &str,
        credential: &AdminCredential,
        params: &[(&str, &str)],
    ) -> AdminResult<Value> {
        let value = self.post_form_unchecked(url, Some(credential), params).await?;
        ensure_not_failed(url, &value)?;
        Ok(value)
    }

    /// Form POST that leaves the body's status for the caller to interpret.
    /// HTTP and transport failures are still errors.
    pub async fn post_form_unchecked(
        &self,
        url: &str,
        credential: Option<&AdminCredential>,
        params: &[(&str, &str)],
    ) -> AdminResult<Value> {
        debug!("POST {url}");
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        let mut request = self.admin.post(url);
        match credential {
            Some(credential) => {
                request = authorize(request, credential);
                form.extend(credential.query_pairs());
            }
            None => form.push(("f", "json")),
        }
        form.extend_from_slice(params);

        let response = send(url, request.form(&form)).await?;
        read_json(url, response).await
    }

    /// Authenticated multipart POST.
    pub async fn post_multipart(
        &self,
        url: &str,
        credential: &AdminCredential,
        form: Form,
    ) -> AdminResult<Value> {
        debug!("POST {url} (multipart)");
        let form = form
            .text("token", credential.token().to_string())
            .text("f", "json");
        let request = authorize(self.admin.post(url), credential).multipart(form);
        let response = send(url, request).await?;
        let value = read_json(url, response).await?;
        ensure_not_failed(url, &value)?;
        Ok(value)
    }
}

fn authorize(request: RequestBuilder, credential: &AdminCredential) -> RequestBuilder {
    if credential.referer().is_empty() {
        request
    } else {
        request.header(reqwest::header::REFERER, credential.referer())
    }
}

async fn send(endpoint: &str, request: RequestBuilder) -> AdminResult<Response> {
    request.send().await.map_err(|e| classify_send_error(endpoint, &e))
}

fn classify_send_error(endpoint: &str, err: &(dyn Error + 'static)) -> AdminError {
    if is_certificate_error(err) {
        AdminError::UntrustedCertificate {
            endpoint: endpoint.to_string(),
        }
    } else {
        AdminError::Transport {
            endpoint: endpoint.to_string(),
            message: error_chain(err),
        }
    }
}

/// Walks the source chain looking for a TLS verification failure.
fn is_certificate_error(err: &(dyn Error + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(current) = source {
        let text = current.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("unknownissuer") {
            return true;
        }
        source = current.source();
    }
    false
}

fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(current) = source {
        message.push_str(": ");
        message.push_str(&current.to_string());
        source = current.source();
    }
    message
}

async fn read_json(endpoint: &str, response: Response) -> AdminResult<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(AdminError::Http {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_send_error(endpoint, &e))?;
    serde_json::from_str(&body)
        .map_err(|e| AdminError::invalid_response(endpoint, format!("invalid JSON: {e}")))
}

/// Rejects bodies that carry an `error` object or a `status` other than
/// `success`. Bodies without either are accepted.
pub(crate) fn ensure_not_failed(endpoint: &str, value: &Value) -> AdminResult<()> {
    if let Some(error) = value.get("error") {
        let code = error.get("code").and_then(Value::as_i64);
        let mut message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        let details = messages(error.get("details"));
        if !details.is_empty() {
            message = format!("{message} ({details})");
        }
        return Err(AdminError::Remote {
            endpoint: endpoint.to_string(),
            status: "error".to_string(),
            code,
            message,
        });
    }

    match value.get("status").and_then(Value::as_str) {
        Some(status) if status != "success" => Err(AdminError::Remote {
            endpoint: endpoint.to_string(),
            status: status.to_string(),
            code: value.get("code").and_then(Value::as_i64),
            message: messages(value.get("messages")),
        }),
        _ => Ok(()),
    }
}

/// Like [`ensure_not_failed`] but also requires an explicit `success`.
pub(crate) fn ensure_success(endpoint: &str, value: &Value) -> AdminResult<()> {
    ensure_not_failed(endpoint, value)?;
    if value.get("status").and_then(Value::as_str) == Some("success") {
        Ok(())
    } else {
        Err(AdminError::Remote {
            endpoint: endpoint.to_string(),
            status: "missing".to_string(),
            code: None,
            message: "response did not report success".to_string(),
        })
    }
}

/// Joins a `messages`/`details` array into one line.
pub(crate) fn messages(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => map
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("; "),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}
