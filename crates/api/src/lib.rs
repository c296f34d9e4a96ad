//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication middleware
//! - Request extractors
//! - Response and error envelopes

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::{Router, http::HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use tripwise_core::itinerary::ItineraryGenerator;
use tripwise_core::store::StoreHandle;
use tripwise_core::voice::SpeechRecognizer;
use tripwise_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence, possibly unavailable.
    pub store: StoreHandle,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Itinerary generator (chat model or template).
    pub planner: Arc<dyn ItineraryGenerator>,
    /// Speech recognizer.
    pub speech: Arc<dyn SpeechRecognizer>,
}

/// Creates the main application router.
///
/// An empty `allowed_origins` list allows any origin without credentials.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
pub(crate) mod test_support;
