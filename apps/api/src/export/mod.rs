// Export Formatters: pure serializers from a committed StructuredDocument to a downloadable file.
// The two formats share only the outline; neither holds state between calls.

pub mod docx;
pub mod metrics;
pub mod outline;
pub mod pdf;

use std::str::FromStr;

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::models::StructuredDocument;

pub const PDF_FILE_NAME: &str = "resume_output.pdf";
pub const DOCX_FILE_NAME: &str = "job-application-materials.docx";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to generate PDF: {0}")]
    Pdf(String),

    #[error("Failed to generate DOCX: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => PDF_FILE_NAME,
            ExportFormat::Docx => DOCX_FILE_NAME,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(format!("Unsupported export format '{other}'")),
        }
    }
}

/// A rendered file, ready to hand to the client as a download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Bytes,
}

impl ExportArtifact {
    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

pub fn export(doc: &StructuredDocument, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::render(doc)?,
        ExportFormat::Docx => docx::render(doc)?,
    };
    info!("Exported {} ({} bytes)", format.file_name(), bytes.len());
    Ok(ExportArtifact {
        format,
        bytes: Bytes::from(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse_is_case_insensitive() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert!("odt".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_file_names_are_fixed() {
        let doc = StructuredDocument::default();
        assert_eq!(
            export(&doc, ExportFormat::Pdf).unwrap().file_name(),
            "resume_output.pdf"
        );
        assert_eq!(
            export(&doc, ExportFormat::Docx).unwrap().file_name(),
            "job-application-materials.docx"
        );
    }
}
