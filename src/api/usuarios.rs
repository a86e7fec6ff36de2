//! Handlers de usuarios
//!
//! Exponen la consulta cache-aside por HTTP.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    cache::CacheStore,
    repositories::UserStore,
    services::{LookupOutcome, LookupStatsSnapshot},
    state::AppState,
    utils::errors::{not_found_error, AppResult},
};

/// Cabecera que indica si la respuesta salió del cache
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Handler para obtener un usuario por id
pub async fn get_usuario(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let (payload, cache_status) = match state.usuarios.get_usuario(id).await? {
        LookupOutcome::CacheHit(payload) => (payload, "HIT"),
        LookupOutcome::FreshFromStore(payload) => (payload, "MISS"),
        LookupOutcome::NotFound => return Err(not_found_error("Usuario", &id.to_string())),
    };

    // El payload ya es JSON; se devuelve tal cual
    let mut response = payload.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status));

    Ok(response)
}

/// Handler de estadísticas de consultas
pub async fn get_cache_stats(State(state): State<AppState>) -> Json<LookupStatsSnapshot> {
    Json(state.usuarios.stats())
}

/// Health check de PostgreSQL y cache
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = state.usuarios.store().ping().await.is_ok();
    let cache = state.usuarios.cache().is_connected().await;

    // Sin cache el servicio sigue respondiendo, solo más lento
    let status = if database { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "database": database,
        "cache": cache,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
