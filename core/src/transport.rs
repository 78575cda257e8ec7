//! Execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the only I/O seam of the crate. `UreqTransport` runs a
//! blocking `ureq` agent on tokio's blocking pool. Non-2xx statuses come back
//! as data rather than errors so `FriendsClient` owns status interpretation.

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};

/// Something that can execute a `GET` and hand back the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` once. No retries.
    ///
    /// Returns `Err` only when no HTTP response was obtained at all.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// Production transport backed by `ureq`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, FetchError> {
    let mut builder = agent.get(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let mut response = builder.call().map_err(|e| match e {
        ureq::Error::BadUri(_) => FetchError::InvalidUrl(request.url.clone()),
        other => FetchError::Transport(other.to_string()),
    })?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    debug!(url = %request.url, status, "executed request");
    Ok(HttpResponse { status, headers, body })
}
