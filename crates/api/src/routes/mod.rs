//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod expenses;
pub mod health;
pub mod travel_plans;
pub mod voice;

/// Creates the `/api` router; everything except auth entry points and voice
/// is behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(travel_plans::routes())
        .merge(expenses::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(auth::routes())
        .merge(voice::routes())
        .merge(protected_routes)
}
