//! ORCID public API client.
//!
//! `RegistryClient` is the seam the acquisition stage depends on; `OrcidClient`
//! is the reqwest-backed implementation wired up in `main`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = "Fundizzle/1.0 (mailto:support@fundizzle.com)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static ORCID_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").expect("valid ORCID iD pattern"));

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid ORCID iD '{0}'")]
    InvalidIdentifier(String),

    #[error("ORCID profile not found or not public")]
    NotFound,

    #[error("ORCID API returned status {status}")]
    Status { status: u16 },

    #[error("ORCID API returned an unreadable body: {0}")]
    Decode(String),

    #[error("unable to reach ORCID: {0}")]
    Unavailable(String),
}

/// A validated ORCID iD: four groups of four digits, the final character
/// optionally the `X` checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrcidId(String);

impl OrcidId {
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let candidate = raw.trim();
        if ORCID_ID_PATTERN.is_match(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(RegistryError::InvalidIdentifier(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrcidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sub-resources fetched alongside the top-level record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySection {
    Works,
    Educations,
    Employments,
    Person,
}

impl RegistrySection {
    pub fn path(self) -> &'static str {
        match self {
            RegistrySection::Works => "works",
            RegistrySection::Educations => "educations",
            RegistrySection::Employments => "employments",
            RegistrySection::Person => "person",
        }
    }
}

#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn fetch_record(&self, id: &OrcidId) -> Result<Value, RegistryError>;

    async fn fetch_section(
        &self,
        id: &OrcidId,
        section: RegistrySection,
    ) -> Result<Value, RegistryError>;
}

#[derive(Clone)]
pub struct OrcidClient {
    client: Client,
    base_url: String,
}

impl OrcidClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value, RegistryError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RegistryError::NotFound),
            status if !status.is_success() => Err(RegistryError::Status {
                status: status.as_u16(),
            }),
            _ => response
                .json::<Value>()
                .await
                .map_err(|e| RegistryError::Decode(e.to_string())),
        }
    }
}

#[async_trait]
impl RegistryClient for OrcidClient {
    async fn fetch_record(&self, id: &OrcidId) -> Result<Value, RegistryError> {
        self.get_json(&format!("{}/{}", self.base_url, id)).await
    }

    async fn fetch_section(
        &self,
        id: &OrcidId,
        section: RegistrySection,
    ) -> Result<Value, RegistryError> {
        self.get_json(&format!("{}/{}/{}", self.base_url, id, section.path()))
            .await
    }
}
