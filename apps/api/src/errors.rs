use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::document::DocumentError;
use crate::orcid_client::RegistryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::ExtractionFailed(msg) => {
                (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED", msg.clone())
            }
            AppError::InvalidIdentifier(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_IDENTIFIER", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The profile registry returned an error. Please try again.".to_string(),
                )
            }
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Upstream unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_UNAVAILABLE",
                    "Unable to connect to the profile registry. Please try again later."
                        .to_string(),
                )
            }
            AppError::RateLimited(msg) => {
                tracing::warn!("Generation service rate limited: {msg}");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    "AI service quota exceeded. Please try again later.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
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

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::UnsupportedMediaType(_) => {
                AppError::UnsupportedMediaType("Only PDF files are allowed".to_string())
            }
            DocumentError::PayloadTooLarge { .. } => {
                AppError::PayloadTooLarge("File too large. Maximum size is 10MB.".to_string())
            }
            DocumentError::ExtractionFailed(msg) => AppError::ExtractionFailed(msg),
            DocumentError::Io(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

/// Malformed or mistyped JSON bodies answer with the error envelope, not axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidIdentifier(_) => {
                AppError::InvalidIdentifier("Invalid ORCID ID format".to_string())
            }
            RegistryError::NotFound => {
                AppError::NotFound("ORCID profile not found or not public".to_string())
            }
            e @ RegistryError::Status { .. } => AppError::Upstream(e.to_string()),
            e @ RegistryError::Decode(_) => AppError::Upstream(e.to_string()),
            RegistryError::Unavailable(e) => AppError::UpstreamUnavailable(e.to_string()),
        }
    }
}
