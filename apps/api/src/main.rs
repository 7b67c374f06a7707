mod config;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod orcid_client;
mod pipeline;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::orcid_client::OrcidClient;
use crate::pipeline::extractor::TextGenerator;
use crate::pipeline::ProfilePipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Profile Import API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (optional: extraction falls back to mock records)
    let generator: Option<Arc<dyn TextGenerator>> = match &config.openai_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(llm))
        }
        None => {
            warn!("OPENAI_API_KEY not set, extraction routes will return mock profiles");
            None
        }
    };

    // Initialize ORCID client
    let registry = Arc::new(OrcidClient::new(&config.orcid_api_base)?);
    info!("ORCID client initialized ({})", config.orcid_api_base);

    info!(
        "Payload budget: {} tokens at {} chars/token",
        config.payload_budget.max_tokens, config.payload_budget.chars_per_token
    );
    let pipeline = Arc::new(ProfilePipeline::new(generator, config.payload_budget));

    let state = AppState {
        pipeline,
        registry,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
