//! Document acquisition — turns an uploaded PDF into plain text.
//!
//! The upload is written to a scratch file that is removed on every outcome,
//! including a panic inside the parser.

use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

const INVALID_PDF: &str = "Invalid PDF file. Please upload a valid PDF.";
const NO_TEXT: &str =
    "Could not extract text from PDF. Please ensure the PDF contains readable text.";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported media type '{0}'")]
    UnsupportedMediaType(String),

    #[error("document is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("{0}")]
    ExtractionFailed(String),

    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub pages: usize,
}

/// Validates the upload, then extracts text and page count on a blocking thread.
pub async fn extract_document(
    upload: UploadedDocument,
    scratch_dir: &Path,
) -> Result<ExtractedDocument, DocumentError> {
    check_upload(&upload)?;

    let mut scratch = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".pdf")
        .tempfile_in(scratch_dir)?;
    scratch.write_all(&upload.bytes)?;
    scratch.flush()?;

    // The scratch file moves into the task and is dropped there.
    let extracted = tokio::task::spawn_blocking(move || read_pdf(scratch))
        .await
        .unwrap_or_else(|e| {
            warn!("PDF parser aborted: {e}");
            Err(DocumentError::ExtractionFailed(INVALID_PDF.to_string()))
        })?;

    info!(
        "Extracted {} characters from {} page(s) of {}",
        extracted.text.len(),
        extracted.pages,
        upload.file_name.as_deref().unwrap_or("upload")
    );
    Ok(extracted)
}

fn check_upload(upload: &UploadedDocument) -> Result<(), DocumentError> {
    let media_type = upload.content_type.as_deref().unwrap_or_default().trim();
    if !media_type.eq_ignore_ascii_case(PDF_MEDIA_TYPE) {
        return Err(DocumentError::UnsupportedMediaType(media_type.to_string()));
    }
    if upload.bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(DocumentError::PayloadTooLarge {
            size: upload.bytes.len(),
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(())
}

fn read_pdf(scratch: NamedTempFile) -> Result<ExtractedDocument, DocumentError> {
    let path = scratch.path();
    let pages = count_pages(path)?;
    let text = pdf_extract::extract_text(path).map_err(|e| {
        warn!("pdf-extract failed: {e}");
        DocumentError::ExtractionFailed(INVALID_PDF.to_string())
    })?;

    if text.trim().is_empty() {
        return Err(DocumentError::ExtractionFailed(NO_TEXT.to_string()));
    }
    Ok(ExtractedDocument { text, pages })
}

fn count_pages(path: &Path) -> Result<usize, DocumentError> {
    let document = lopdf::Document::load(path).map_err(|e| {
        warn!("lopdf could not load upload: {e}");
        DocumentError::ExtractionFailed(INVALID_PDF.to_string())
    })?;
    Ok(document.get_pages().len())
}
