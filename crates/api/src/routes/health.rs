//! Service banner and liveness probe.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// `GET /health` body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Which optional backends are wired in.
    pub components: Components,
}

/// Backend availability as decided at startup.
#[derive(Debug, Serialize)]
pub struct Components {
    /// Whether a database is connected.
    pub database: bool,
    /// Itinerary generator in use.
    pub planner: &'static str,
    /// Whether speech recognition is configured.
    pub speech: bool,
}

/// `GET /` body.
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    /// Greeting.
    pub message: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Tripwise travel planner API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Degraded backends do not make the service unhealthy; they are reported
/// under `components`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        components: Components {
            database: state.store.is_available(),
            planner: state.planner.name(),
            speech: state.speech.status().available,
        },
    })
}

/// Creates the root routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
}
