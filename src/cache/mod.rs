//! Cache
//!
//! Este módulo contiene el cliente de cache (Redis o memoria) detrás
//! del trait `CacheStore`, y la generación de claves.

pub mod cache_config;
pub mod memory_cache;
pub mod redis_client;

use async_trait::async_trait;
use std::time::Duration;

use crate::utils::errors::AppResult;

pub use cache_config::{CacheBackend, CacheConfig, CACHE_TTL, USUARIO_PREFIX};
pub use memory_cache::MemoryCache;
pub use redis_client::RedisClient;

/// Operaciones de cache sobre valores ya serializados.
///
/// Un miss es `Ok(None)`. Los errores son siempre `AppError::CacheUnavailable`;
/// quien llama decide si degradarlos.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Leer el valor de una clave si existe y no ha expirado
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Escribir (sobrescribiendo) un valor que expira tras `ttl`
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Verificar si el backend responde
    async fn is_connected(&self) -> bool;
}

/// Generar clave de cache `"<entidad>:<id>"`
pub fn cache_key(entity_type: &str, id: impl std::fmt::Display) -> String {
    format!("{}:{}", entity_type, id)
}

/// Generar clave de cache de usuario
pub fn usuario_key(id: i32) -> String {
    cache_key(USUARIO_PREFIX, id)
}
