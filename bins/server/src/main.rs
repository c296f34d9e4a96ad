//! Tripwise API Server
//!
//! Main entry point for the Tripwise backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripwise_api::{AppState, create_router};
use tripwise_core::itinerary::{ItineraryGenerator, TemplatePlanner};
use tripwise_core::store::StoreHandle;
use tripwise_core::voice::{SpeechRecognizer, UnconfiguredRecognizer};
use tripwise_db::{SeaOrmStore, connect};
use tripwise_integrations::{ChatCompletionPlanner, PlannerError, XfyunRecognizer};
use tripwise_shared::config::{DatabaseConfig, LlmConfig, SpeechConfig};
use tripwise_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripwise=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let state = AppState {
        store: open_store(&config.database).await,
        jwt_service: Arc::new(JwtService::new(JwtConfig::from(&config.jwt))),
        planner: build_planner(&config.llm),
        speech: build_recognizer(&config.speech),
    };

    let app = create_router(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects to the database; failures leave the store unavailable instead of
/// aborting startup.
async fn open_store(config: &DatabaseConfig) -> StoreHandle {
    let Some(url) = config.url.as_deref().filter(|u| !u.trim().is_empty()) else {
        warn!("No database URL configured; data endpoints will return 503");
        return StoreHandle::Unavailable("no database URL configured".into());
    };

    match connect(url, config).await {
        Ok(db) => {
            info!("Connected to database");
            StoreHandle::available(SeaOrmStore::new(db))
        }
        Err(e) => {
            warn!(error = %e, "Database connection failed; data endpoints will return 503");
            StoreHandle::Unavailable(e.to_string())
        }
    }
}

fn build_planner(config: &LlmConfig) -> Arc<dyn ItineraryGenerator> {
    match ChatCompletionPlanner::from_config(config) {
        Ok(planner) => {
            info!(model = %config.model, base_url = %config.base_url, "Itinerary model configured");
            Arc::new(planner)
        }
        Err(PlannerError::MissingApiKey) => {
            info!("No LLM API key configured; itineraries come from the template");
            Arc::new(TemplatePlanner)
        }
        Err(e) => {
            warn!(error = %e, "Could not build LLM client; using the template planner");
            Arc::new(TemplatePlanner)
        }
    }
}

fn build_recognizer(config: &SpeechConfig) -> Arc<dyn SpeechRecognizer> {
    if let Some(recognizer) = XfyunRecognizer::from_config(config) {
        info!(host = %config.host, "Speech recognition configured");
        Arc::new(recognizer)
    } else {
        warn!("Speech recognition credentials missing; voice upload endpoints will return 503");
        Arc::new(UnconfiguredRecognizer)
    }
}
