//! Uploaded documents and their text extraction.
//!
//! PDF text comes from `pdf-extract`, DOCX text from `docx-rs`. Both parsers
//! are synchronous and CPU-bound, so `FileTextExtractor` runs them on the
//! blocking pool.

pub mod candidate;
pub mod upload;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from the filename extension, falling back to the
    /// declared content type when the extension is not `.pdf` or `.docx`.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Result<Self, AppError> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            return Ok(DocumentFormat::Pdf);
        }
        if lower.ends_with(".docx") {
            return Ok(DocumentFormat::Docx);
        }

        match content_type.map(|ct| ct.split(';').next().unwrap_or(ct).trim()) {
            Some(PDF_CONTENT_TYPE) => Ok(DocumentFormat::Pdf),
            Some(DOCX_CONTENT_TYPE) => Ok(DocumentFormat::Docx),
            _ => Err(AppError::UnsupportedFormat(format!(
                "'{filename}' is not a PDF or DOCX file"
            ))),
        }
    }
}

/// An uploaded file, consumed once to produce text.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes,
        }
    }

    pub fn format(&self) -> Result<DocumentFormat, AppError> {
        DocumentFormat::detect(&self.filename, self.content_type.as_deref())
    }
}

/// Turns a document into plain text. Implementations must fail with
/// `UnsupportedFormat` or `ExtractionFailed`, and never return blank text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &Document) -> Result<String, AppError>;
}

/// Default extractor backed by `pdf-extract` and `docx-rs`.
pub struct FileTextExtractor;

#[async_trait]
impl TextExtractor for FileTextExtractor {
    async fn extract(&self, document: &Document) -> Result<String, AppError> {
        let format = document.format()?;
        let bytes = document.bytes.clone();

        // The parsers may panic on hostile input; a JoinError covers that too.
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes, format))
            .await
            .map_err(|e| {
                AppError::ExtractionFailed(format!("{}: parser aborted: {e}", document.filename))
            })?
            .map_err(|e| AppError::ExtractionFailed(format!("{}: {e}", document.filename)))?;

        debug!(
            document = %document.filename,
            chars = text.len(),
            "Extracted document text"
        );
        ensure_text(&document.filename, text)
    }
}

/// Rejects whitespace-only output.
pub fn ensure_text(filename: &str, text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::ExtractionFailed(format!(
            "{filename}: the file is empty or text could not be extracted"
        )));
    }
    Ok(text)
}

fn extract_text(data: &[u8], format: DocumentFormat) -> Result<String, String> {
    match format {
        DocumentFormat::Pdf => extract_text_from_pdf(data),
        DocumentFormat::Docx => extract_text_from_docx(data),
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| format!("error reading PDF: {e}"))
}

fn extract_text_from_docx(data: &[u8]) -> Result<String, String> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx = docx_rs::read_docx(data).map_err(|e| format!("error reading DOCX: {e}"))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        match run_child {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            _ => {}
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}
