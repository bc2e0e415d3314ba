//! Session: the hosting view for one tailoring workflow.
//!
//! A session owns the resume text, the job description, the optional `DocumentEditor` and the
//! last user-visible error. There is no document (and so no editing) until a generation
//! succeeds. Deleting the session discards everything; nothing is persisted.

pub mod handlers;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::editor::{DocumentEditor, EditorMode};
use crate::errors::AppError;
use crate::export::{export, ExportArtifact, ExportFormat};
use crate::generation::GenerationError;
use crate::models::StructuredDocument;

pub use store::SessionStore;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    resume_text: String,
    job_description: String,
    editor: Option<DocumentEditor>,
    error: Option<String>,
    generating: bool,
}

/// Snapshot returned by every session route.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resume_uploaded: bool,
    pub job_description_provided: bool,
    pub generating: bool,
    pub error: Option<String>,
    pub mode: Option<EditorMode>,
    pub document: Option<StructuredDocument>,
    pub working_copy: Option<StructuredDocument>,
    pub can_export: bool,
}

/// Inputs captured when a generation starts, so the lock can be released for the network call.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub resume_text: String,
    pub job_description: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            resume_text: String::new(),
            job_description: String::new(),
            editor: None,
            error: None,
            generating: false,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            created_at: self.created_at,
            resume_uploaded: !self.resume_text.is_empty(),
            job_description_provided: !self.job_description.is_empty(),
            generating: self.generating,
            error: self.error.clone(),
            mode: self.editor.as_ref().map(DocumentEditor::mode),
            document: self.editor.as_ref().map(|e| e.committed().clone()),
            working_copy: self
                .editor
                .as_ref()
                .and_then(|e| e.working_copy().cloned()),
            can_export: self.can_export(),
        }
    }

    pub fn set_resume_text(&mut self, text: String) {
        self.resume_text = text;
    }

    pub fn set_job_description(&mut self, text: String) {
        self.job_description = text;
    }

    /// Exports are offered once a document exists and no edit is in progress.
    pub fn can_export(&self) -> bool {
        self.editor
            .as_ref()
            .is_some_and(|e| e.mode() == EditorMode::Viewing)
    }

    // ── generation ──────────────────────────────────────────────────────────

    /// Marks a generation as started. Clears the previous document and error.
    ///
    /// Refuses to start a second one while the first is still in flight.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, AppError> {
        if self.generating {
            return Err(AppError::GenerationInProgress);
        }
        self.generating = true;
        self.editor = None;
        self.error = None;
        Ok(GenerationTicket {
            resume_text: self.resume_text.clone(),
            job_description: self.job_description.clone(),
        })
    }

    /// Applies the outcome of the generation started by `begin_generation`.
    ///
    /// Success replaces the document wholesale; failure leaves it absent and records the
    /// message for display.
    pub fn finish_generation(
        &mut self,
        outcome: Result<StructuredDocument, GenerationError>,
    ) -> Result<(), GenerationError> {
        self.generating = false;
        match outcome {
            Ok(document) => {
                info!("Session {}: document generated", self.id);
                self.editor = Some(DocumentEditor::new(document));
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Session {}: generation failed: {e}", self.id);
                self.editor = None;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ── editing ─────────────────────────────────────────────────────────────

    pub fn editor_mut(&mut self) -> Result<&mut DocumentEditor, AppError> {
        self.editor.as_mut().ok_or(AppError::NoDocument)
    }

    // ── export ──────────────────────────────────────────────────────────────

    /// Exports the committed document. A failure is reported and leaves the document as it was.
    pub fn export(&self, format: ExportFormat) -> Result<ExportArtifact, AppError> {
        let editor = self.editor.as_ref().ok_or(AppError::NoDocument)?;
        if editor.mode() == EditorMode::Editing {
            return Err(AppError::Conflict(
                "Save or discard edits before exporting".to_string(),
            ));
        }
        Ok(export(editor.committed(), format)?)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
