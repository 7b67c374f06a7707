use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::ingest::document::{extract_document, UploadedDocument};
use crate::ingest::registry::acquire_orcid;
use crate::models::orcid::OrcidDocument;
use crate::models::profile::ProfileRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ParsePdfResponse {
    pub text: String,
    pub message: &'static str,
    pub pages: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrcidRequest {
    #[serde(default)]
    pub orcid_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOrcidResponse {
    pub data: OrcidDocument,
    pub message: &'static str,
    pub orcid_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOrcidRequest {
    #[serde(default)]
    pub orcid_data: Option<Value>,
    #[serde(default)]
    pub orcid_id: Option<String>,
}

/// POST /api/v1/profile/parse-pdf
pub async fn handle_parse_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParsePdfResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let extracted = extract_document(upload, &state.config.upload_dir).await?;
    Ok(Json(ParsePdfResponse {
        text: extracted.text,
        message: "PDF parsed successfully",
        pages: extracted.pages,
    }))
}

/// POST /api/v1/profile/fetch-orcid
pub async fn handle_fetch_orcid(
    State(state): State<AppState>,
    body: Result<Json<OrcidRequest>, JsonRejection>,
) -> Result<Json<FetchOrcidResponse>, AppError> {
    let Json(req) = body?;
    let raw_id = required_orcid_id(req.orcid_id)?;
    let (id, data) = acquire_orcid(state.registry.as_ref(), &raw_id).await?;
    Ok(Json(FetchOrcidResponse {
        data,
        message: "ORCID profile fetched successfully",
        orcid_id: id.to_string(),
    }))
}

/// POST /api/v1/profile/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    body: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ProfileRecord>, AppError> {
    let Json(req) = body?;
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No text provided".to_string()))?;
    let record = state.pipeline.extract_resume(&text).await?;
    Ok(Json(record))
}

/// POST /api/v1/profile/extract-orcid
pub async fn handle_extract_orcid(
    State(state): State<AppState>,
    body: Result<Json<ExtractOrcidRequest>, JsonRejection>,
) -> Result<Json<ProfileRecord>, AppError> {
    let Json(req) = body?;
    let data = req
        .orcid_data
        .filter(|d| !d.is_null())
        .ok_or_else(|| AppError::Validation("No ORCID data provided".to_string()))?;
    let document = OrcidDocument::from_value(data)
        .map_err(|e| AppError::Validation(format!("Malformed ORCID data: {e}")))?;

    let supplied_id = req.orcid_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
    let record = state.pipeline.extract_orcid(&document, supplied_id).await?;
    Ok(Json(record))
}

/// POST /api/v1/profile/import-pdf
/// Upload, text extraction and structured extraction in one call.
pub async fn handle_import_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProfileRecord>, AppError> {
    let upload = read_upload(multipart).await?;
    let extracted = extract_document(upload, &state.config.upload_dir).await?;
    let record = state.pipeline.extract_resume(&extracted.text).await?;
    Ok(Json(record))
}

/// POST /api/v1/profile/import-orcid
/// Registry fetch and structured extraction in one call.
pub async fn handle_import_orcid(
    State(state): State<AppState>,
    body: Result<Json<OrcidRequest>, JsonRejection>,
) -> Result<Json<ProfileRecord>, AppError> {
    let Json(req) = body?;
    let raw_id = required_orcid_id(req.orcid_id)?;
    let (id, document) = acquire_orcid(state.registry.as_ref(), &raw_id).await?;
    info!("Importing ORCID profile {id}");
    let record = state
        .pipeline
        .extract_orcid(&document, Some(id.as_str()))
        .await?;
    Ok(Json(record))
}

fn required_orcid_id(orcid_id: Option<String>) -> Result<String, AppError> {
    orcid_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("ORCID ID is required".to_string()))
}

/// Takes the field named `file`, or failing that the first field carrying a filename.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedDocument {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation("No file uploaded".to_string()))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large. Maximum size is 10MB.".to_string())
    } else {
        AppError::Validation(format!("Invalid upload: {}", err.body_text()))
    }
}
