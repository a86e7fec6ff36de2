//! API endpoints
//!
//! Este módulo contiene los endpoints de la API.

pub mod usuarios;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(usuarios::health))
        .route("/api/usuarios/:id", get(usuarios::get_usuario))
        .route("/api/cache/stats", get(usuarios::get_cache_stats))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
