//! Intake Adapter: turns one uploaded resume file into plain text.
//!
//! The accepted kinds are decided before any bytes are read: declared content type first,
//! then the file extension when the type is missing or generic. Each kind has its own
//! extractor (pdf-extract for PDF, docx-rs for DOCX, lossy UTF-8 for plain text).

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Unsupported file type. Please upload PDF, DOCX, or TXT.")]
    UnsupportedFileType,

    #[error("The uploaded file contains no readable text")]
    EmptyFile,

    #[error("Could not read {kind:?} file: {reason}")]
    Unreadable { kind: FileKind, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Docx,
    PlainText,
}

impl FileKind {
    /// Picks the kind from the declared content type, falling back to the extension.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Result<Self, IntakeError> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

        match mime.as_deref() {
            Some(PDF_MIME) => Ok(FileKind::Pdf),
            Some(DOCX_MIME) => Ok(FileKind::Docx),
            Some(TEXT_MIME) => Ok(FileKind::PlainText),
            Some(_) => Err(IntakeError::UnsupportedFileType),
            None => Self::from_extension(file_name),
        }
    }

    fn from_extension(file_name: Option<&str>) -> Result<Self, IntakeError> {
        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Ok(FileKind::Pdf),
            Some("docx") => Ok(FileKind::Docx),
            Some("txt") => Ok(FileKind::PlainText),
            _ => Err(IntakeError::UnsupportedFileType),
        }
    }
}

/// Result of a successful intake.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub kind: FileKind,
    pub text: String,
}

/// Extracts text synchronously. Blank results are rejected.
pub fn extract_text(kind: FileKind, bytes: &[u8]) -> Result<String, IntakeError> {
    let text = match kind {
        FileKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        FileKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| IntakeError::Unreadable {
                kind,
                reason: e.to_string(),
            })?
        }
        FileKind::Docx => docx_paragraphs(bytes)?.join("\n"),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(IntakeError::EmptyFile);
    }
    Ok(text)
}

/// Detects the kind and extracts the text off the async runtime.
///
/// PDF parsing is CPU-bound and may panic on hostile input; it runs inside `spawn_blocking`
/// so a panic surfaces as `Unreadable` rather than taking down the request task.
pub async fn read_upload(
    content_type: Option<&str>,
    file_name: Option<&str>,
    bytes: Vec<u8>,
) -> Result<IntakeOutcome, IntakeError> {
    let kind = FileKind::detect(content_type, file_name).map_err(|e| {
        warn!(
            "Rejected upload {:?} with content type {:?}",
            file_name, content_type
        );
        e
    })?;

    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || extract_text(kind, &bytes))
        .await
        .map_err(|e| IntakeError::Unreadable {
            kind,
            reason: e.to_string(),
        })??;

    info!(
        "Read {:?} upload: {} bytes → {} chars of text",
        kind,
        size,
        text.chars().count()
    );
    Ok(IntakeOutcome { kind, text })
}

/// Text of every top-level paragraph in a DOCX file, one entry per paragraph.
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, IntakeError> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx = docx_rs::read_docx(bytes).map_err(|e| IntakeError::Unreadable {
        kind: FileKind::Docx,
        reason: e.to_string(),
    })?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for run in &paragraph.children {
                if let ParagraphChild::Run(run) = run {
                    for piece in &run.children {
                        match piece {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            _ => {}
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }
    Ok(paragraphs)
}
