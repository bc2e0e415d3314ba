//! Axum route handlers for the Session API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::editor::{Collection, ListValue, ScalarField};
use crate::errors::AppError;
use crate::export::ExportFormat;
use crate::generation::GenerationError;
use crate::intake::{read_upload, FileKind};
use crate::session::SessionView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldValueBody {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub kind: FileKind,
    pub characters: usize,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct AppendResponse {
    pub index: usize,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
    pub session: SessionView,
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let handle = state.sessions.create().await;
    let view = handle.lock().await.view();
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let view = handle.lock().await.view();
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload; the resume is the `file` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<IntakeResponse>, AppError> {
    let handle = state.sessions.get(id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let outcome = read_upload(content_type.as_deref(), file_name.as_deref(), bytes.to_vec()).await?;

        let mut session = handle.lock().await;
        let characters = outcome.text.chars().count();
        session.set_resume_text(outcome.text);
        return Ok(Json(IntakeResponse {
            kind: outcome.kind,
            characters,
            session: session.view(),
        }));
    }

    Err(AppError::Validation(
        "Multipart body must contain a 'file' field".to_string(),
    ))
}

/// PUT /api/v1/sessions/:id/resume
pub async fn handle_set_resume_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TextBody>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.set_resume_text(body.text);
    Ok(Json(session.view()))
}

/// PUT /api/v1/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TextBody>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.set_job_description(body.text);
    Ok(Json(session.view()))
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/generate
///
/// The session lock is released for the duration of the remote call; the in-flight flag
/// set by `begin_generation` keeps a second call out meanwhile. The call and its settlement run
/// on their own task, so a client that disconnects mid-call still leaves the session settled.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let ticket = handle.lock().await.begin_generation()?;

    info!("Session {id}: generation requested");
    let task = tokio::spawn({
        let handle = handle.clone();
        let generator = state.generator.clone();
        async move {
            let outcome = generator
                .generate(&ticket.resume_text, &ticket.job_description)
                .await;
            let mut session = handle.lock().await;
            let settled = session.finish_generation(outcome);
            settled.map(|()| session.view())
        }
    });

    match task.await {
        Ok(settled) => Ok(Json(settled?)),
        Err(e) => {
            error!("Session {id}: generation task failed: {e}");
            let _ = handle
                .lock()
                .await
                .finish_generation(Err(GenerationError::ServiceUnavailable(
                    "generation was interrupted".to_string(),
                )));
            Err(AppError::Internal(anyhow::anyhow!(
                "generation task failed: {e}"
            )))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Editing
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/edit
pub async fn handle_begin_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.editor_mut()?.begin_edit()?;
    Ok(Json(session.view()))
}

/// POST /api/v1/sessions/:id/edit/commit
pub async fn handle_commit_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.editor_mut()?.commit_edit()?;
    Ok(Json(session.view()))
}

/// POST /api/v1/sessions/:id/edit/discard
pub async fn handle_discard_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.editor_mut()?.discard_edit()?;
    Ok(Json(session.view()))
}

/// PUT /api/v1/sessions/:id/document/fields/:field
pub async fn handle_set_field(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
    Json(body): Json<FieldValueBody>,
) -> Result<Json<SessionView>, AppError> {
    let field: ScalarField = field.parse().map_err(AppError::Validation)?;
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.editor_mut()?.set_scalar_field(field, body.value)?;
    debug!("Session {id}: updated {}", field.as_str());
    Ok(Json(session.view()))
}

/// POST /api/v1/sessions/:id/document/:collection
pub async fn handle_append_item(
    State(state): State<AppState>,
    Path((id, collection)): Path<(Uuid, String)>,
) -> Result<(StatusCode, Json<AppendResponse>), AppError> {
    let collection: Collection = collection.parse().map_err(AppError::Validation)?;
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let index = session.editor_mut()?.append_list_item(collection)?;
    Ok((
        StatusCode::CREATED,
        Json(AppendResponse {
            index,
            session: session.view(),
        }),
    ))
}

/// PATCH /api/v1/sessions/:id/document/:collection/:index
///
/// Body is a JSON string for flat lists or a partial entry object for experience/education.
pub async fn handle_update_item(
    State(state): State<AppState>,
    Path((id, collection, index)): Path<(Uuid, String, usize)>,
    Json(body): Json<Value>,
) -> Result<Json<SessionView>, AppError> {
    let collection: Collection = collection.parse().map_err(AppError::Validation)?;
    let value = ListValue::for_collection(body, collection).ok_or_else(|| {
        AppError::Validation(format!(
            "Body does not match the item type of {collection}"
        ))
    })?;
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session
        .editor_mut()?
        .update_list_item(collection, index, value)?;
    Ok(Json(session.view()))
}

/// DELETE /api/v1/sessions/:id/document/:collection/:index
pub async fn handle_remove_item(
    State(state): State<AppState>,
    Path((id, collection, index)): Path<(Uuid, String, usize)>,
) -> Result<Json<RemoveResponse>, AppError> {
    let collection: Collection = collection.parse().map_err(AppError::Validation)?;
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let removed = session.editor_mut()?.remove_list_item(collection, index)?;
    Ok(Json(RemoveResponse {
        removed,
        session: session.view(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Export
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/export/:format
///
/// Responds with the file as an attachment under its fixed name.
pub async fn handle_export(
    State(state): State<AppState>,
    Path((id, format)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse().map_err(AppError::Validation)?;
    let handle = state.sessions.get(id).await?;
    let artifact = handle.lock().await.export(format)?;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name()),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}
