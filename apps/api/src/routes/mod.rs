pub mod health;
pub mod profile;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ingest::document::MAX_DOCUMENT_BYTES;
use crate::state::AppState;

/// Room for multipart framing on top of the document size limit, so an
/// oversized document reaches the size check instead of a truncated read.
const UPLOAD_BODY_LIMIT: usize = MAX_DOCUMENT_BYTES + 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Acquisition only
        .route(
            "/api/v1/profile/parse-pdf",
            post(profile::handle_parse_pdf).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/profile/fetch-orcid",
            post(profile::handle_fetch_orcid),
        )
        // Extraction only
        .route("/api/v1/profile/extract", post(profile::handle_extract))
        .route(
            "/api/v1/profile/extract-orcid",
            post(profile::handle_extract_orcid),
        )
        // End to end
        .route(
            "/api/v1/profile/import-pdf",
            post(profile::handle_import_pdf).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/profile/import-orcid",
            post(profile::handle_import_orcid),
        )
        .with_state(state)
}
