//! Structured Extractor — one generation call turns source text into a JSON object.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, OUTPUT_RULES};
use crate::llm_client::{strip_json_fences, LlmError};
use crate::pipeline::compactor::render_payload;
use crate::pipeline::prompts::{
    ORCID_EXTRACT_PROMPT, ORCID_EXTRACT_SYSTEM, RESUME_EXTRACT_PROMPT, RESUME_EXTRACT_SYSTEM,
};
use crate::pipeline::PipelineError;

pub const EXTRACTION_TEMPERATURE: f32 = 0.1;
pub const EXTRACTION_MAX_TOKENS: u32 = 4000;

/// A single system + user prompt pair.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Anything that can complete a prompt. `LlmClient` in production, fakes in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;
}

/// What the extractor is reading.
#[derive(Debug, Clone, Copy)]
pub enum ExtractionSource<'a> {
    /// Free text from a resume or exported profile.
    Resume(&'a str),
    /// A compacted ORCID payload.
    Orcid(&'a Value),
}

impl ExtractionSource<'_> {
    fn system(&self) -> String {
        let base = match self {
            ExtractionSource::Resume(_) => RESUME_EXTRACT_SYSTEM,
            ExtractionSource::Orcid(_) => ORCID_EXTRACT_SYSTEM,
        };
        format!("{base} {JSON_ONLY_SYSTEM}")
    }

    fn prompt(&self) -> String {
        match self {
            ExtractionSource::Resume(text) => RESUME_EXTRACT_PROMPT
                .replace("{output_rules}", OUTPUT_RULES)
                .replace("{profile_text}", text),
            ExtractionSource::Orcid(payload) => ORCID_EXTRACT_PROMPT
                .replace("{output_rules}", OUTPUT_RULES)
                .replace("{orcid_payload}", &render_payload(payload)),
        }
    }
}

/// Sends one request and returns the model's top-level JSON object.
pub async fn extract_fields(
    generator: &dyn TextGenerator,
    source: ExtractionSource<'_>,
) -> Result<Map<String, Value>, PipelineError> {
    let system = source.system();
    let prompt = source.prompt();
    debug!("Extraction prompt is {} characters", prompt.len());

    let raw = generator
        .generate(&CompletionRequest {
            system: &system,
            prompt: &prompt,
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: EXTRACTION_MAX_TOKENS,
        })
        .await?;

    parse_object(&raw)
}

/// Parses model output as a JSON object, tolerating markdown code fences.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, PipelineError> {
    match serde_json::from_str::<Value>(strip_json_fences(raw)) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => {
            warn!("Model returned JSON that is not an object");
            Err(PipelineError::ExtractionParse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
        Err(e) => Err(PipelineError::ExtractionParse(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
