use std::sync::Arc;

use crate::config::Config;
use crate::orcid_client::RegistryClient;
use crate::pipeline::ProfilePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ProfilePipeline>,
    /// ORCID client. `OrcidClient` in production; swapped for a fake in tests.
    pub registry: Arc<dyn RegistryClient>,
    pub config: Config,
}
