//! Generation Client: the single point of entry for calls to the remote generation service.
//!
//! No other module talks to the generation backend directly. The network hop sits behind
//! `GenerationTransport`, so the precondition checks and response normalization here are the
//! same whether the transport is HTTP or an in-process fake.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{DocumentCandidate, StructuredDocument};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Please provide both resume and job description.")]
    MissingInput,

    #[error("Can't connect to server: {0}")]
    ServiceUnavailable(String),

    #[error("Generation service returned an unreadable response: {0}")]
    MalformedResponse(String),
}

/// Request body sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub resume: &'a str,
    pub job_description: &'a str,
}

/// One request/response exchange with the generation service.
///
/// Implementations return the raw candidate; normalization is the client's job.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn send(&self, request: &GenerateRequest<'_>) -> Result<DocumentCandidate, GenerationError>;
}

/// Validates inputs, calls the transport once, and normalizes the result.
#[derive(Clone)]
pub struct GenerationClient {
    transport: Arc<dyn GenerationTransport>,
}

impl GenerationClient {
    pub fn new(transport: Arc<dyn GenerationTransport>) -> Self {
        Self { transport }
    }

    /// Produces a fresh `StructuredDocument` from resume text and a job description.
    ///
    /// Fails with `MissingInput` before any network activity if either input is blank.
    pub async fn generate(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<StructuredDocument, GenerationError> {
        if resume_text.trim().is_empty() || job_description.trim().is_empty() {
            return Err(GenerationError::MissingInput);
        }

        let request = GenerateRequest {
            resume: resume_text,
            job_description,
        };

        let candidate = self.transport.send(&request).await.map_err(|e| {
            warn!("Generation call failed: {e}");
            e
        })?;

        let document = candidate.normalize();
        info!(
            "Generation succeeded: {} highlights, {} experience entries",
            document.resume_highlights.len(),
            document.experience.len()
        );
        Ok(document)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-process transport that counts calls and replays a canned outcome.
    pub(crate) struct FakeTransport {
        pub calls: AtomicUsize,
        pub last_request: Mutex<Option<(String, String)>>,
        outcome: Result<Value, GenerationError>,
    }

    impl FakeTransport {
        pub(crate) fn returning(body: Value) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                outcome: Ok(body),
            })
        }

        pub(crate) fn failing(error: GenerationError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                outcome: Err(error),
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationTransport for FakeTransport {
        async fn send(
            &self,
            request: &GenerateRequest<'_>,
        ) -> Result<DocumentCandidate, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((
                request.resume.to_string(),
                request.job_description.to_string(),
            ));
            match &self.outcome {
                Ok(body) => serde_json::from_value(body.clone())
                    .map_err(|e| GenerationError::MalformedResponse(e.to_string())),
                Err(e) => Err(e.clone()),
            }
        }
    }

    pub(crate) fn sample_response() -> Value {
        json!({
            "summary": "Experienced engineer",
            "resume": ["Led team of 5"],
            "coverLetter": "Dear Hiring Manager...",
            "linkedIn": "Results-driven engineer...",
            "experience": [],
            "qualifications": { "education": [], "certifications": [], "skills": [] }
        })
    }

    #[tokio::test]
    async fn test_generate_maps_response_into_document() {
        let transport = FakeTransport::returning(sample_response());
        let client = GenerationClient::new(transport.clone());

        let doc = client
            .generate("Jane Doe, 5 years experience", "Senior Engineer role")
            .await
            .unwrap();

        assert_eq!(doc.summary, "Experienced engineer");
        assert_eq!(doc.resume_highlights, vec!["Led team of 5"]);
        assert_eq!(doc.profile_bio, "Results-driven engineer...");
        assert!(doc.experience.is_empty());
        assert_eq!(transport.call_count(), 1);
        assert_eq!(
            transport.last_request.lock().unwrap().clone(),
            Some((
                "Jane Doe, 5 years experience".to_string(),
                "Senior Engineer role".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_empty_job_description_never_calls_transport() {
        let transport = FakeTransport::returning(sample_response());
        let client = GenerationClient::new(transport.clone());

        let err = client
            .generate("Jane Doe, 5 years experience", "")
            .await
            .unwrap_err();

        assert_eq!(err, GenerationError::MissingInput);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_resume_counts_as_missing() {
        let transport = FakeTransport::returning(sample_response());
        let client = GenerationClient::new(transport.clone());

        let err = client.generate("  \n", "Senior Engineer role").await.unwrap_err();
        assert_eq!(err, GenerationError::MissingInput);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_is_propagated() {
        let transport = FakeTransport::failing(GenerationError::ServiceUnavailable(
            "503 Service Unavailable".into(),
        ));
        let client = GenerationClient::new(transport.clone());

        let err = client.generate("resume", "jd").await.unwrap_err();
        assert!(err.to_string().contains("503 Service Unavailable"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_are_defaulted() {
        let transport = FakeTransport::returning(json!({ "summary": "Only this" }));
        let client = GenerationClient::new(transport);

        let doc = client.generate("resume", "jd").await.unwrap();
        assert_eq!(doc.summary, "Only this");
        assert!(doc.resume_highlights.is_empty());
        assert!(doc.qualifications.skills.is_empty());
    }

    #[test]
    fn test_request_serializes_with_backend_field_names() {
        let body = serde_json::to_value(GenerateRequest {
            resume: "r",
            job_description: "j",
        })
        .unwrap();
        assert_eq!(body, json!({ "resume": "r", "jobDescription": "j" }));
    }
}
