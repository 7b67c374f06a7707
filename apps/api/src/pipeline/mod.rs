//! Profile extraction pipeline.
//!
//! Source → Compactor (ORCID only) → Extractor → Validator → Reconciler (ORCID only).
//! Stages are plain functions; `ProfilePipeline` wires them together and owns
//! the failure policy at the boundary.

pub mod compactor;
pub mod extractor;
pub mod mock;
pub mod prompts;
pub mod reconciler;
pub mod shapes;
pub mod validator;

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::models::orcid::OrcidDocument;
use crate::models::profile::ProfileRecord;
use compactor::PayloadBudget;
use extractor::{ExtractionSource, TextGenerator};
use validator::ProfileFlavor;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no text-generation credential is configured")]
    ConfigurationMissing,

    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("model output could not be parsed: {0}")]
    ExtractionParse(String),
}

pub struct ProfilePipeline {
    generator: Option<Arc<dyn TextGenerator>>,
    budget: PayloadBudget,
}

impl ProfilePipeline {
    /// `generator` is `None` when no credential is configured; every
    /// extraction then returns the fixed mock record for its flavor.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, budget: PayloadBudget) -> Self {
        Self { generator, budget }
    }

    /// POST /extract semantics: free text in, resume-flavored record out.
    pub async fn extract_resume(&self, text: &str) -> Result<ProfileRecord, AppError> {
        settle(self.try_extract_resume(text).await, mock::resume_profile)
    }

    /// ORCID document in, ORCID-flavored record out.
    pub async fn extract_orcid(
        &self,
        document: &OrcidDocument,
        supplied_id: Option<&str>,
    ) -> Result<ProfileRecord, AppError> {
        settle(
            self.try_extract_orcid(document, supplied_id).await,
            || mock::orcid_profile(supplied_id),
        )
    }

    async fn try_extract_resume(&self, text: &str) -> Result<ProfileRecord, PipelineError> {
        let generator = self.generator()?;
        let fields = extractor::extract_fields(generator, ExtractionSource::Resume(text)).await?;
        Ok(validator::validate(fields, ProfileFlavor::Resume))
    }

    async fn try_extract_orcid(
        &self,
        document: &OrcidDocument,
        supplied_id: Option<&str>,
    ) -> Result<ProfileRecord, PipelineError> {
        let generator = self.generator()?;

        let compacted = compactor::compact(document, &self.budget);
        info!(
            "Compacted ORCID payload: level={:?} estimated_tokens={}",
            compacted.level, compacted.estimated_tokens
        );

        let fields =
            extractor::extract_fields(generator, ExtractionSource::Orcid(&compacted.payload))
                .await?;
        let mut record = validator::validate(fields, ProfileFlavor::Orcid);

        reconciler::reconcile(&mut record, &compacted.complete);
        validator::finalize_orcid_id(&mut record, supplied_id);
        Ok(record)
    }

    fn generator(&self) -> Result<&dyn TextGenerator, PipelineError> {
        self.generator
            .as_deref()
            .ok_or(PipelineError::ConfigurationMissing)
    }
}

/// Boundary policy: missing credentials yield the mock, rate limits are
/// surfaced, and every other failure yields an all-empty record.
fn settle(
    result: Result<ProfileRecord, PipelineError>,
    mock: impl FnOnce() -> ProfileRecord,
) -> Result<ProfileRecord, AppError> {
    match result {
        Ok(record) => Ok(record),
        Err(PipelineError::ConfigurationMissing) => {
            warn!("OPENAI_API_KEY not configured, returning mock profile");
            Ok(mock())
        }
        Err(PipelineError::Generation(e)) if e.is_rate_limited() => {
            Err(AppError::RateLimited(e.to_string()))
        }
        Err(e) => {
            error!("Profile extraction failed, returning empty profile: {e}");
            Ok(ProfileRecord::default())
        }
    }
}
