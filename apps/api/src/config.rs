use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::pipeline::compactor::PayloadBudget;

const DEFAULT_ORCID_API_BASE: &str = "https://pub.orcid.org/v3.0";

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing `OPENAI_API_KEY` switches extraction to mock records.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub orcid_api_base: String,
    pub upload_dir: PathBuf,
    pub payload_budget: PayloadBudget,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PayloadBudget::default();

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            orcid_api_base: optional_env("ORCID_API_BASE")
                .unwrap_or_else(|| DEFAULT_ORCID_API_BASE.to_string()),
            upload_dir: optional_env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            payload_budget: PayloadBudget {
                max_tokens: parse_env("PROFILE_TOKEN_CEILING", defaults.max_tokens)?,
                chars_per_token: parse_env("PROFILE_CHARS_PER_TOKEN", defaults.chars_per_token)?,
            },
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
