//! HTTP transport for the generation service (`POST {GENERATION_URL}`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::generation::client::{GenerateRequest, GenerationError, GenerationTransport};
use crate::models::DocumentCandidate;

/// Error body some backends send alongside a failure status.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(alias = "message")]
    error: String,
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn send(&self, request: &GenerateRequest<'_>) -> Result<DocumentCandidate, GenerationError> {
        debug!(
            "POST {} (resume {} chars, job description {} chars)",
            self.endpoint,
            request.resume.len(),
            request.job_description.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::ServiceUnavailable(e.to_string()))?;

        if !status.is_success() {
            warn!("Generation service returned {}: {}", status, body);
            return Err(GenerationError::ServiceUnavailable(describe_failure(status, &body)));
        }

        serde_json::from_str(&body).map_err(|e| GenerationError::MalformedResponse(e.to_string()))
    }
}

/// `"502 Bad Gateway"`, plus the service's own message when it sent one.
fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    let mut description = status.to_string();
    if let Ok(parsed) = serde_json::from_str::<ServiceErrorBody>(body) {
        description.push_str(": ");
        description.push_str(&parsed.error);
    }
    description
}
