use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editor::EditorError;
use crate::export::ExportError;
use crate::generation::GenerationError;
use crate::intake::IntakeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No document has been generated yet")]
    NoDocument,

    #[error("A generation is already in progress for this session")]
    GenerationInProgress,

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::NoDocument => (StatusCode::CONFLICT, "NO_DOCUMENT"),
            AppError::GenerationInProgress => (StatusCode::CONFLICT, "GENERATION_IN_PROGRESS"),
            AppError::Editor(e) => match e {
                EditorError::NotEditing => (StatusCode::CONFLICT, "NOT_EDITING"),
                EditorError::AlreadyEditing => (StatusCode::CONFLICT, "ALREADY_EDITING"),
                EditorError::IndexOutOfRange { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INDEX_OUT_OF_RANGE")
                }
                EditorError::ValueMismatch { .. } => (StatusCode::BAD_REQUEST, "VALUE_MISMATCH"),
            },
            AppError::Generation(e) => match e {
                GenerationError::MissingInput => (StatusCode::BAD_REQUEST, "MISSING_INPUT"),
                GenerationError::ServiceUnavailable(_) => {
                    (StatusCode::BAD_GATEWAY, "SERVICE_UNAVAILABLE")
                }
                GenerationError::MalformedResponse(_) => {
                    (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE")
                }
            },
            AppError::Intake(e) => match e {
                IntakeError::UnsupportedFileType => {
                    (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FILE_TYPE")
                }
                IntakeError::EmptyFile => (StatusCode::BAD_REQUEST, "EMPTY_FILE"),
                IntakeError::Unreadable { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "UNREADABLE_FILE")
                }
            },
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILURE")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Internal details stay in the log.
        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            _ => message,
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Collection;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(GenerationError::MissingInput.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GenerationError::ServiceUnavailable("502 Bad Gateway".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(
                EditorError::IndexOutOfRange {
                    collection: Collection::Skills,
                    index: 3,
                    len: 1
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(IntakeError::UnsupportedFileType.into()),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(status_of(AppError::NoDocument), StatusCode::CONFLICT);
        assert_eq!(status_of(AppError::GenerationInProgress), StatusCode::CONFLICT);
        assert_eq!(
            status_of(ExportError::Pdf("boom".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_carries_code_and_message() {
        let response = AppError::from(GenerationError::MissingInput).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "MISSING_INPUT");
        assert_eq!(
            body["error"]["message"],
            "Please provide both resume and job description."
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::Internal(anyhow::anyhow!("secret path /etc")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }
}
